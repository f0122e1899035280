use launcher_core::error::readiness::ReadinessError;
use launcher_core::readiness::{POLL_INTERVAL, cancellation, wait_until_ready};

use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Public API tests for the readiness probe
// These drive wait_until_ready against live local endpoints
// ============================================================================

/// **VALUE**: Verifies that a responding endpoint resolves the poll immediately.
///
/// **WHY THIS MATTERS**: This is the happy path of every launch; if it breaks,
/// the window never opens even with a healthy server.
///
/// **BUG THIS CATCHES**: Would catch the success arm being keyed off anything
/// stricter than "the request resolved" (wrong matcher, status filtering, etc.).
#[tokio::test]
async fn given_responding_endpoint_when_waiting_then_resolves_ready() {
    // GIVEN: A live endpoint answering 200
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // WHEN: Polling it
    let (_cancel, mut receiver) = cancellation();
    let result = wait_until_ready(&server.uri(), &mut receiver).await;

    // THEN: Ready on the first attempt
    assert!(result.is_ok(), "Poll should resolve: {result:?}");
}

/// **VALUE**: Verifies that an HTTP error status still counts as readiness.
///
/// **WHY THIS MATTERS**: The probe only detects that the server is answering;
/// application-level errors are the window's business, not the launcher's. A
/// server that boots into a 500 must still get its window.
///
/// **BUG THIS CATCHES**: Would catch an `is_success()` filter sneaking into the
/// probe, which would spin forever against a serving-but-unhappy backend.
#[tokio::test]
async fn given_endpoint_answering_500_when_waiting_then_still_counts_as_ready() {
    // GIVEN: A live endpoint answering 500
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // WHEN: Polling it
    let (_cancel, mut receiver) = cancellation();
    let result = wait_until_ready(&server.uri(), &mut receiver).await;

    // THEN: Any resolved response is readiness
    assert!(
        result.is_ok(),
        "An HTTP error status is still an answer: {result:?}"
    );
}

/// **VALUE**: Verifies the retry loop keeps polling through transport failures and
/// succeeds once the server starts listening.
///
/// **WHY THIS MATTERS**: This is the exact boot sequence in production: the
/// process is spawned, the port refuses connections for a while, then the
/// server binds and the first successful probe opens the window.
///
/// **BUG THIS CATCHES**: Would catch a transport failure being treated as
/// terminal, or retries firing without their full delay (a busy-loop hammering
/// the port during boot).
#[tokio::test]
async fn given_endpoint_that_boots_late_when_waiting_then_retries_until_it_answers() {
    // GIVEN: A port that starts out refusing connections
    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
        let port = probe.local_addr().expect("probe addr").port();
        drop(probe);
        port
    };
    let url = format!("http://127.0.0.1:{port}");

    // AND: A server that only binds after a few poll intervals
    tokio::spawn(async move {
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("bind late listener");
        let (mut stream, _) = listener.accept().await.expect("accept probe");
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .expect("write response");
    });

    // WHEN: Polling from before the bind
    let started = Instant::now();
    let (_cancel, mut receiver) = cancellation();
    let result = wait_until_ready(&url, &mut receiver).await;
    let elapsed = started.elapsed();

    // THEN: Success, after the failed attempts each scheduled a full delay
    assert!(
        result.is_ok(),
        "Poll should succeed once the listener is up: {result:?}"
    );
    assert!(
        elapsed >= POLL_INTERVAL * 2,
        "Failed attempts must each wait out the retry delay, got {elapsed:?}"
    );
}

/// **VALUE**: Verifies that cancelling mid-poll unblocks the loop promptly.
///
/// **WHY THIS MATTERS**: Closing the app while the server is still booting goes
/// through this path. Without it, teardown would have to wait for a server that
/// may never come up.
///
/// **BUG THIS CATCHES**: Would catch cancellation only being checked between
/// whole attempts (or not at all), which would stall shutdown by at least one
/// transport timeout.
#[tokio::test]
async fn given_cancellation_during_polling_when_no_server_exists_then_returns_promptly() {
    // GIVEN: A poll running against a dead port
    let (cancel, mut receiver) = cancellation();
    let poll = tokio::spawn(async move {
        wait_until_ready("http://127.0.0.1:9", &mut receiver).await
    });

    // WHEN: Cancelling after a couple of attempts
    tokio::time::sleep(POLL_INTERVAL * 2).await;
    cancel.cancel();

    // THEN: The loop reports cancellation well before any retry horizon
    let result = tokio::time::timeout(Duration::from_secs(2), poll)
        .await
        .expect("cancelled poll should settle quickly")
        .expect("poll task should not panic");
    assert!(
        matches!(result, Err(ReadinessError::Cancelled { .. })),
        "Expected cancellation, got {result:?}"
    );
}
