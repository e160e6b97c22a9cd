// src/tests/scraper_tests/fetcher_tests.rs
use crate::scraper::fetcher::{Fetcher, PACING_SECS};
use crate::scraper::{FetchError, ScraperError};
use crate::tests::utils::{ok_page, RecordingDelay, ScriptedTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const URL: &str = "https://www.olx.in/spare-parts_c1585/q-car-covers";

fn timeout() -> Result<crate::scraper::fetcher::PageResponse, FetchError> {
    Err(FetchError::Timeout("operation timed out".into()))
}

#[test]
fn four_timeouts_then_success_returns_the_page() {
    let transport = ScriptedTransport::default();
    for _ in 0..4 {
        transport.push(URL, timeout());
    }
    transport.push(URL, Ok(ok_page("<html>ok</html>")));

    let delay = RecordingDelay::default();
    let fetcher = Fetcher::new(transport.clone(), delay.clone());

    let resp = fetcher.fetch(URL, 5).expect("fifth attempt should succeed");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "<html>ok</html>");
    assert_eq!(transport.requests().len(), 5);

    // pacing before each of the 5 attempts, timeout backoff after each of the 4 failures
    let pauses = delay.pauses();
    assert_eq!(pauses.iter().filter(|p| **p == PACING_SECS).count(), 5);
    assert_eq!(pauses.iter().filter(|p| **p == (5.0, 10.0)).count(), 4);
}

#[test]
fn five_failures_return_an_error_without_panicking() {
    let transport = ScriptedTransport::default();
    for _ in 0..5 {
        transport.push(URL, timeout());
    }

    let delay = RecordingDelay::default();
    let fetcher = Fetcher::new(transport.clone(), delay.clone());

    match fetcher.fetch(URL, 5) {
        Err(ScraperError::Fetch { url, attempts, last }) => {
            assert_eq!(url, URL);
            assert_eq!(attempts, 5);
            assert!(matches!(last, FetchError::Timeout(_)));
        }
        other => panic!("expected exhausted fetch, got {other:?}"),
    }

    assert_eq!(transport.requests().len(), 5);
    // no backoff after the final attempt
    assert_eq!(delay.pauses().len(), 5 + 4);
}

#[test]
fn backoff_window_matches_each_failure_class() {
    let transport = ScriptedTransport::default();
    transport
        .push(URL, Err(FetchError::Connection("connection reset by peer".into())))
        .push(URL, Err(FetchError::status(503)))
        .push(URL, timeout())
        .push(URL, Ok(ok_page("done")));

    let delay = RecordingDelay::default();
    let fetcher = Fetcher::new(transport, delay.clone());

    assert!(fetcher.fetch(URL, 5).is_ok());
    assert_eq!(
        delay.pauses(),
        vec![
            PACING_SECS,
            (3.0, 8.0),
            PACING_SECS,
            (2.0, 6.0),
            PACING_SECS,
            (5.0, 10.0),
            PACING_SECS,
        ]
    );
}

#[test]
fn http_error_status_is_retried_like_any_request_failure() {
    let transport = ScriptedTransport::default();
    transport
        .push(URL, Err(FetchError::status(403)))
        .push(URL, Ok(ok_page("let in")));

    let fetcher = Fetcher::new(transport.clone(), RecordingDelay::default());

    assert_eq!(fetcher.fetch(URL, 2).unwrap().body, "let in");
    assert_eq!(transport.requests(), vec![URL.to_string(), URL.to_string()]);
}

#[test]
fn zero_attempts_still_tries_once() {
    let transport = ScriptedTransport::default();
    transport.push(URL, Ok(ok_page("once")));

    let fetcher = Fetcher::new(transport.clone(), RecordingDelay::default());

    assert!(fetcher.fetch(URL, 0).is_ok());
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn raised_stop_flag_sends_no_request() {
    let transport = ScriptedTransport::default();
    transport.push(URL, Ok(ok_page("never read")));

    let stop = Arc::new(AtomicBool::new(true));
    let fetcher = Fetcher::new(transport.clone(), RecordingDelay::default()).with_stop_flag(stop);

    assert!(matches!(fetcher.fetch(URL, 5), Err(ScraperError::Interrupted)));
    assert!(transport.requests().is_empty());
}

#[test]
fn stop_between_attempts_ends_the_retry_loop() {
    let transport = ScriptedTransport::default();
    for _ in 0..5 {
        transport.push(URL, timeout());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let fetcher = Fetcher::new(transport.clone(), RecordingDelay::default()).with_stop_flag(Arc::clone(&stop));

    // first attempt goes out, then the user interrupts
    let first = fetcher.fetch(URL, 1);
    assert!(matches!(first, Err(ScraperError::Fetch { .. })));
    stop.store(true, Ordering::SeqCst);

    assert!(matches!(fetcher.fetch(URL, 5), Err(ScraperError::Interrupted)));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn content_type_comes_from_response_headers() {
    let page = ok_page("<html></html>");
    assert_eq!(page.content_type(), Some("text/html; charset=utf-8"));

    let bare = crate::scraper::fetcher::PageResponse {
        headers: Default::default(),
        ..page
    };
    assert_eq!(bare.content_type(), None);
}
