#![forbid(unsafe_code)]

//! Tracing span instrumentation tests.
//!
//! Spans enabled:
//!   cargo test -p weft-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead check (no feature):
//!   cargo test -p weft-widgets --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use weft_core::geometry::Rect;
use weft_render::Buffer;
use weft_widgets::{Primitive, Table, TextView};
#[cfg(feature = "tracing")]
use weft_widgets::{Block, Dispatcher, Flex, PrimitiveRef};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// One span as it was opened: name, recorded fields and the span that was
/// current at the time.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Opened {
    name: &'static str,
    fields: HashMap<&'static str, String>,
    parent: Option<&'static str>,
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
impl Opened {
    /// A field value with string quoting removed.
    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim_matches('"'))
    }

    fn is_widget(&self, widget: &str) -> bool {
        self.name == "widget_render" && self.field("widget") == Some(widget)
    }
}

/// Debug-formats every field; `tracing` routes the typed `record_*`
/// methods here by default.
#[derive(Default)]
struct Fields(HashMap<&'static str, String>);

impl tracing::field::Visit for Fields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name(), format!("{value:?}"));
    }
}

/// Layer that appends every new span to a shared log.
#[derive(Clone, Default)]
struct SpanLog(Arc<Mutex<Vec<Opened>>>);

impl SpanLog {
    fn named(&self, name: &str) -> Vec<Opened> {
        let log = self.0.lock().unwrap();
        log.iter().filter(|s| s.name == name).cloned().collect()
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanLog
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        let parent = ctx.lookup_current().map(|span| span.name());
        self.0.lock().unwrap().push(Opened {
            name: attrs.metadata().name(),
            fields: fields.0,
            parent,
        });
    }
}

/// Run `f` with a [`SpanLog`] installed as the default subscriber.
fn with_captured_spans(f: impl FnOnce()) -> SpanLog {
    let log = SpanLog::default();
    let subscriber = tracing_subscriber::registry().with(log.clone());
    tracing::subscriber::with_default(subscriber, f);
    log
}

fn sample_table() -> Arc<Table> {
    let table = Table::new();
    for row in 0..4 {
        for column in 0..3 {
            table.set_cell_text(row, column, format!("r{row}c{column}"));
        }
    }
    table
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn widgets_open_render_spans() {
    let handle = with_captured_spans(|| {
        let mut grid = Buffer::new(30, 10);
        let area = Rect::new(0, 0, 30, 10);

        let block = Block::new();
        block.set_rect(area);
        block.draw(&mut grid);

        let view = TextView::new();
        view.set_text("hello");
        view.set_rect(area);
        view.draw(&mut grid);

        let table = sample_table();
        table.set_rect(area);
        table.draw(&mut grid);
    });

    let spans = handle.named("widget_render");
    for widget in ["Block", "TextView", "Table"] {
        assert!(
            spans.iter().any(|s| s.is_widget(widget)),
            "missing a {widget} span, got: {spans:?}"
        );
    }
}

#[test]
#[cfg(feature = "tracing")]
fn frame_span_nests_under_the_widget() {
    let handle = with_captured_spans(|| {
        let mut grid = Buffer::new(20, 5);
        let table = sample_table();
        table.block().set_border(true);
        table.set_rect(Rect::new(0, 0, 20, 5));
        table.draw(&mut grid);
    });

    let block_span = handle
        .named("widget_render")
        .into_iter()
        .find(|s| s.is_widget("Block"))
        .expect("a Block span");
    assert_eq!(block_span.parent, Some("widget_render"));
}

#[test]
#[cfg(feature = "tracing")]
fn table_layout_span_records_the_solve() {
    let handle = with_captured_spans(|| {
        let mut grid = Buffer::new(24, 6);
        let table = sample_table();
        table.set_rect(Rect::new(0, 0, 24, 6));
        table.draw(&mut grid);
    });

    let spans = handle.named("table_layout");
    assert_eq!(spans.len(), 1, "one solve per draw");
    let span = &spans[0];
    assert_eq!(span.field("rows"), Some("4"));
    assert_eq!(span.parent, Some("widget_render"));
}

#[test]
#[cfg(feature = "tracing")]
fn focus_changes_open_a_span() {
    let handle = with_captured_spans(|| {
        let flex = Flex::new();
        let a: PrimitiveRef = Block::new();
        let b: PrimitiveRef = Block::new();
        flex.add_item(Some(a), 0, 1, false);
        flex.add_item(Some(b.clone()), 0, 1, false);
        let mut dispatcher = Dispatcher::new(flex);
        dispatcher.set_focus(b);
    });

    assert_eq!(handle.named("focus_change").len(), 2);
}

#[test]
#[cfg(feature = "tracing")]
fn render_span_fields_carry_the_area() {
    let handle = with_captured_spans(|| {
        let mut grid = Buffer::new(40, 30);
        let block = Block::new();
        block.set_rect(Rect::new(5, 10, 30, 15));
        block.draw(&mut grid);
    });

    let span = handle
        .named("widget_render")
        .into_iter()
        .find(|s| s.is_widget("Block"))
        .expect("a Block span");
    let area: Vec<_> = ["x", "y", "w", "h"].map(|f| span.field(f)).into();
    assert_eq!(area, [Some("5"), Some("10"), Some("30"), Some("15")]);
}

/// Without the `tracing` feature the instrumentation compiles away.
#[test]
fn zero_overhead_when_disabled() {
    let handle = with_captured_spans(|| {
        let mut grid = Buffer::new(20, 5);
        let area = Rect::new(0, 0, 20, 5);

        let view = TextView::new();
        view.set_text("test");
        view.set_rect(area);
        view.draw(&mut grid);

        let table = sample_table();
        table.set_rect(area);
        table.draw(&mut grid);
    });

    let spans = handle.named("widget_render");

    #[cfg(feature = "tracing")]
    assert!(!spans.is_empty(), "spans expected with the feature on");

    #[cfg(not(feature = "tracing"))]
    assert!(
        spans.is_empty(),
        "no widget_render spans expected without the feature (got {})",
        spans.len()
    );
}
