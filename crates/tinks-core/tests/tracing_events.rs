//! Structured log output of the page controllers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tinks_core::navigation::Direction;
use tinks_core::testing::{ManualHost, MockTree};
use tinks_core::{PageConfig, PageEvent, PageRunner};
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    target: String,
    message: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_owned(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.push((field.name().to_owned(), value.to_owned()));
    }
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let capture = EventCapture::default();
    let events = Arc::clone(&capture.events);
    let subscriber = tracing_subscriber::registry().with(capture);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn at(events: &[CapturedEvent], target: &str, level: Level) -> Vec<CapturedEvent> {
    events
        .iter()
        .filter(|e| e.target == target && e.level == level)
        .cloned()
        .collect()
}

#[test]
fn active_change_is_logged_once() {
    let events = with_captured_tracing(|| {
        let mut runner = PageRunner::new(MockTree::strip(4), PageConfig::default(), false);
        let mut host = ManualHost::new();
        runner.tree_mut().center_on(2);
        host.send(&mut runner, PageEvent::Scroll);
        host.run_frame(&mut runner);
        host.send(&mut runner, PageEvent::Scroll);
        host.run_frame(&mut runner);
    });

    let changes = at(&events, "tinks::tracker", Level::DEBUG);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].message, "active card changed");
    assert_eq!(changes[0].field("from"), Some("0"));
    assert_eq!(changes[0].field("to"), Some("2"));
}

#[test]
fn boundary_navigation_logs_without_scrolling() {
    let events = with_captured_tracing(|| {
        let mut runner = PageRunner::new(MockTree::strip(3), PageConfig::default(), false);
        runner.dispatch(PageEvent::Navigate(Direction::Previous));
    });

    assert!(at(&events, "tinks::nav", Level::DEBUG).is_empty());
    let boundary = at(&events, "tinks::nav", Level::TRACE);
    assert_eq!(boundary.len(), 1);
    assert_eq!(boundary[0].message, "navigation at boundary");
}

#[test]
fn splash_phases_are_logged_in_order() {
    let events = with_captured_tracing(|| {
        let mut runner = PageRunner::new(MockTree::strip(2), PageConfig::default(), false);
        let mut host = ManualHost::new();
        runner.start();
        host.pump(&mut runner);
        host.advance(&mut runner, Duration::from_secs(10));
    });

    let phases: Vec<String> = at(&events, "tinks::splash", Level::DEBUG)
        .iter()
        .filter(|e| e.message == "splash phase changed")
        .filter_map(|e| e.field("phase").map(str::to_owned))
        .collect();
    assert_eq!(phases, ["fading", "entered", "settled"]);
}
