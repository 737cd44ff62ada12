#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Placement spans enabled:
//!   cargo test -p gloss-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p gloss-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use gloss_core::geometry::Extent;
use gloss_widgets::placement::compute_offset;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every new span.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_spans<F>(f: F) -> Vec<CapturedSpan>
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: Arc::clone(&spans),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = spans.lock().unwrap().clone();
    captured
}

fn place() -> f64 {
    compute_offset(
        Extent::new(960.0, 100.0),
        Extent::new(0.0, 200.0),
        1000.0,
        16.0,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn placement_emits_span_with_inputs() {
    let spans = with_captured_spans(|| {
        assert_eq!(place(), -176.0);
    });

    let span = spans
        .iter()
        .find(|s| s.name == "compute_offset")
        .expect("compute_offset span");
    assert_eq!(span.fields.get("anchor_left").map(String::as_str), Some("960"));
    assert_eq!(span.fields.get("tooltip_width").map(String::as_str), Some("200"));
    assert_eq!(span.fields.get("margin").map(String::as_str), Some("16"));
}

#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let spans = with_captured_spans(|| {
        assert_eq!(place(), -176.0);
    });
    assert!(spans.iter().all(|s| s.name != "compute_offset"));
}
