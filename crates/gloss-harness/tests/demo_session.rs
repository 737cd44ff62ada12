//! Scripted session and configuration tests for the harness.

use std::collections::HashMap;

use gloss_harness::{
    ENV_CELL_WIDTH, ENV_LOG, ENV_LOG_JSON, ENV_VIEWPORT_WIDTH, HarnessConfig, HarnessError,
    run_demo,
};
use pretty_assertions::assert_eq;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn empty_environment_uses_defaults() {
    let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, HarnessConfig::default());
    assert_eq!(config.log_filter, "info");
    assert!(!config.log_json);
}

#[test]
fn environment_overrides_defaults() {
    let config = HarnessConfig::from_lookup(lookup(&[
        (ENV_VIEWPORT_WIDTH, "480"),
        (ENV_CELL_WIDTH, " 10 "),
        (ENV_LOG, "gloss_widgets=trace"),
        (ENV_LOG_JSON, "TRUE"),
    ]))
    .unwrap();
    assert_eq!(config.viewport_width, 480.0);
    assert_eq!(config.cell_width, 10.0);
    assert_eq!(config.log_filter, "gloss_widgets=trace");
    assert!(config.log_json);
}

#[test]
fn unparsable_numbers_are_rejected() {
    for bad in ["wide", "-3", "0", "NaN", ""] {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_VIEWPORT_WIDTH, bad)])).unwrap_err();
        match err {
            HarnessError::InvalidEnv { var, value } => {
                assert_eq!(var, ENV_VIEWPORT_WIDTH);
                assert_eq!(value, bad);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn unknown_json_flag_is_rejected() {
    let err = HarnessConfig::from_lookup(lookup(&[(ENV_LOG_JSON, "maybe")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value for GLOSS_LOG_JSON: \"maybe\""
    );
}

// ============================================================================
// Scripted session
// ============================================================================

#[test]
fn session_walks_through_every_step() {
    let snapshots = run_demo(&HarnessConfig::default()).unwrap();
    let labels: Vec<&str> = snapshots.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "mounted",
            "click كتاب",
            "tap outside",
            "space on rumah",
            "click المسجد near the right edge",
            "reveal translation",
            "unmounted",
        ]
    );
}

#[test]
fn tooltips_appear_and_disappear() {
    let snapshots = run_demo(&HarnessConfig::default()).unwrap();
    let tooltip_count = |i: usize| snapshots[i].markup.matches("role=\"tooltip\"").count();

    assert_eq!(tooltip_count(0), 0);
    assert_eq!(tooltip_count(1), 1);
    assert!(snapshots[1].markup.contains(">buku</span>"));
    assert_eq!(tooltip_count(2), 0);
    assert_eq!(tooltip_count(3), 1);
    assert!(snapshots[3].markup.contains("lang=\"ar\" role=\"tooltip\""));
    // Opening the edge word closes nothing else: rumah stays open.
    assert_eq!(tooltip_count(4), 2);
}

#[test]
fn edge_word_is_clamped_inside_viewport() {
    let config = HarnessConfig::default();
    let snapshots = run_demo(&config).unwrap();
    let edge = snapshots[4].offsets[2].unwrap();

    // wrapper pinned at width - 40, 6 columns wide; tooltip is 20 columns.
    let left = config.viewport_width - 40.0;
    let tooltip_width = 20.0 * config.cell_width;
    assert_eq!(left + edge + tooltip_width, config.viewport_width - 16.0);
}

#[test]
fn static_word_never_opens() {
    let snapshots = run_demo(&HarnessConfig::default()).unwrap();
    for snapshot in &snapshots[..snapshots.len() - 1] {
        assert!(snapshot.markup.contains("<span class=\"arabicTextOnly\" dir=\"rtl\" lang=\"ar\">و</span>"));
    }
    assert_eq!(snapshots[0].offsets.len(), 3);
}

#[test]
fn reveal_block_toggles_and_unmount_clears_the_page() {
    let snapshots = run_demo(&HarnessConfig::default()).unwrap();
    assert!(snapshots[4].markup.contains("class=\"translationWrapper\""));
    assert!(snapshots[5].markup.contains("class=\"translationWrapper visible\""));

    let last = snapshots.last().unwrap();
    assert!(!last.markup.contains("wrapper"));
    assert!(!last.markup.contains("container"));
    assert!(last.to_string().starts_with("== unmounted =="));
}

#[test]
fn narrow_viewport_still_runs() {
    let config = HarnessConfig::default().viewport(120.0, 400.0);
    let snapshots = run_demo(&config).unwrap();
    assert_eq!(snapshots.len(), 7);
}
