#![forbid(unsafe_code)]

//! Gloss scenario runner.
//!
//! ```sh
//! GLOSS_VIEWPORT_WIDTH=480 GLOSS_LOG=debug cargo run -p gloss-harness
//! ```

use std::process::ExitCode;

use gloss_harness::{HarnessConfig, init_tracing, run_demo};

fn main() -> ExitCode {
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gloss-harness: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_tracing(&config) {
        eprintln!("gloss-harness: {err}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        viewport_width = config.viewport_width,
        viewport_height = config.viewport_height,
        cell_width = config.cell_width,
        "starting scripted session"
    );

    match run_demo(&config) {
        Ok(snapshots) => {
            for snapshot in snapshots {
                println!("{snapshot}\n");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "session failed");
            eprintln!("gloss-harness: {err}");
            ExitCode::FAILURE
        }
    }
}
