use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

#[derive(Default)]
struct CountingWaker(AtomicUsize);

impl EventLoopWaker for CountingWaker {
    fn wake(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn malformed_urls() {
    assert!(is_malformed_url(""));
    assert!(is_malformed_url("  \t"));
    assert!(!is_malformed_url("file:///tmp/a.png"));
}

#[test]
fn deliver_sends_and_wakes() {
    let waker = Arc::new(CountingWaker::default());
    let (tx, rx) = Completions::channel();
    let tx = tx.with_waker(waker.clone());

    let token = LoadToken::new(2, 9);
    assert!(tx.deliver(LoadOutcome {
        token,
        result: Err(LoadFailure::Cancelled),
    }));
    let got = rx.try_recv().unwrap();
    assert_eq!(got.token, token);
    assert_eq!(got.result.unwrap_err(), LoadFailure::Cancelled);
    assert_eq!(waker.0.load(Ordering::SeqCst), 1);
}

#[test]
fn deliver_reports_dropped_receiver() {
    let (tx, rx) = Completions::channel();
    drop(rx);
    assert!(!tx.deliver(LoadOutcome {
        token: LoadToken::new(0, 1),
        result: Err(LoadFailure::Cancelled),
    }));
}

#[test]
fn failure_display() {
    assert_eq!(
        LoadFailure::InvalidUrl(String::new()).to_string(),
        "malformed url ''"
    );
    assert!(LoadFailure::Fetch("x".into()).to_string().starts_with("fetch failed"));
}
