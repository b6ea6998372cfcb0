#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "tracing"), allow(dead_code, unused_imports))]

//! Tracing integration tests.
//!
//! Reconciliation spans and events enabled:
//!   cargo test -p odo-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p odo-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use odo_core::geometry::Rect;
use odo_text::MonospaceMeasure;
use odo_widgets::FormattedNumberField;
#[cfg(feature = "tracing")]
use odo_widgets::Reconcile;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    message: String,
    fields: HashMap<String, String>,
    parent: Option<String>,
}

struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn events_with(&self, needle: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message.contains(needle))
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
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

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let parent = ctx.event_span(event).map(|s| s.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            message,
            fields,
            parent,
        });
    }
}

fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let handle = CaptureHandle {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(Capture { spans, events });
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn field() -> FormattedNumberField {
    let mut field = FormattedNumberField::new();
    field.set_area(Rect::new(0, 0, 20, 3));
    field
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn reconcile_span_records_animation_flag() {
    let handle = with_capture(|| {
        let mut field = field();
        field.set_value(Some(42), true);
    });

    let spans = handle.spans();
    let reconciles: Vec<_> = spans.iter().filter(|s| s.name == "reconcile").collect();
    assert!(
        reconciles
            .iter()
            .any(|s| s.fields.get("animated").map(String::as_str) == Some("true")),
        "expected an animated reconcile span, got {reconciles:?}"
    );
    assert!(
        reconciles
            .iter()
            .any(|s| s.fields.get("animated").map(String::as_str) == Some("false")),
        "set_area should produce an unanimated pass"
    );
}

#[test]
#[cfg(feature = "tracing")]
fn applied_pass_logs_pool_shape() {
    let handle = with_capture(|| {
        let mut field = field();
        field.set_value(Some(123), false);
        field.set_value(Some(12), true);
    });

    let events = handle.events_with("reconciled roller pool");
    let last = events.last().expect("reconcile event");
    assert_eq!(last.fields.get("pool").map(String::as_str), Some("2"));
    assert_eq!(last.fields.get("retired").map(String::as_str), Some("1"));
    assert_eq!(last.parent.as_deref(), Some("reconcile"));
}

#[test]
#[cfg(feature = "tracing")]
fn stale_pass_is_logged() {
    let handle = with_capture(|| {
        let short = |text: &str| -> Vec<Rect> {
            let mut boxes = odo_text::GlyphMeasure::character_boxes(&MonospaceMeasure::new(), text);
            boxes.truncate(1);
            boxes
        };
        let mut field = FormattedNumberField::with_measure(short);
        field.set_area(Rect::new(0, 0, 20, 3));
        field.set_value(Some(1_000), false);
        assert_eq!(
            field.reconcile(false),
            Reconcile::Stale {
                graphemes: 5,
                boxes: 1
            }
        );
    });

    let events = handle.events_with("glyph boxes disagree");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].fields.get("graphemes").map(String::as_str), Some("5"));
}

#[test]
#[cfg(feature = "tracing")]
fn text_change_is_logged_once() {
    let handle = with_capture(|| {
        let mut field = field();
        field.set_value(Some(7), false);
        field.set_value(Some(7), true);
    });
    assert_eq!(handle.events_with("number field text changed").len(), 1);
}

#[test]
fn zero_overhead_when_disabled() {
    let handle = with_capture(|| {
        let mut field = FormattedNumberField::with_measure(MonospaceMeasure::new());
        field.set_area(Rect::new(0, 0, 20, 3));
        field.set_value(Some(9_999), true);
        field.tick(std::time::Duration::from_millis(500));
    });

    let reconciles = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "reconcile")
        .count();

    #[cfg(feature = "tracing")]
    assert!(reconciles > 0, "with tracing, reconcile spans should be present");

    #[cfg(not(feature = "tracing"))]
    assert_eq!(
        reconciles, 0,
        "without tracing, no reconcile spans should exist"
    );
}
