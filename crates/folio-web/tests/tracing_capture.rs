//! Log output of the synchronizer, captured through a fmt layer.
//!
//! Run:
//!   cargo test -p folio-web --test tracing_capture

mod common;

use common::portfolio_page;
use folio_core::event::Event;
use folio_runtime::LogSink;
use folio_web::{FolioConfig, Synchronizer};
use tracing_subscriber::layer::SubscriberExt;
use web_time::Duration;

fn capture<F: FnOnce()>(f: F) -> Vec<String> {
    let sink = LogSink::new(256);
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(sink.clone())
            .with_ansi(false)
            .without_time(),
    );
    tracing::subscriber::with_default(subscriber, f);
    sink.take_lines()
}

#[test]
fn loaded_is_logged() {
    let lines = capture(|| {
        let (surface, _) = portfolio_page();
        let mut sync = Synchronizer::new(surface, FolioConfig::default()).expect("valid config");
        sync.handle(Event::ContentLoaded);
    });
    assert!(
        lines.iter().any(|l| l.contains("Portfolio loaded successfully!")),
        "got {lines:?}"
    );
}

#[test]
fn init_and_submission_are_logged() {
    let lines = capture(|| {
        let (surface, _) = portfolio_page();
        let mut sync = Synchronizer::new(surface, FolioConfig::default()).expect("valid config");
        sync.init();
        sync.handle(Event::Submit);
        sync.advance_time(Duration::from_millis(1500));
    });
    assert!(lines.iter().any(|l| l.contains("synchronizer initialized")), "got {lines:?}");
    assert!(lines.iter().any(|l| l.contains("contact form submitted")), "got {lines:?}");
    assert!(lines.iter().all(|l| !l.contains("ERROR")), "got {lines:?}");
}
