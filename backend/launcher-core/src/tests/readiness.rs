// Unit tests for poll cancellation
// Probe behavior against live endpoints is covered in integration_tests/readiness.rs

use crate::error::readiness::ReadinessError;
use crate::readiness::{cancellation, wait_until_ready};

/// **VALUE**: Verifies that a poll whose cancel handle already fired returns
/// `Cancelled` instead of entering the retry loop.
///
/// **WHY THIS MATTERS**: The retry loop is deliberately unbounded. Cancellation
/// is its only exit besides success; if it does not take effect, teardown during
/// the boot phase leaks a timer that polls forever.
///
/// **BUG THIS CATCHES**: Would catch the cancellation branch being dropped from
/// either select arm, which would leave the loop running after shutdown.
#[tokio::test]
async fn given_fired_cancel_handle_when_waiting_then_returns_cancelled() {
    // GIVEN: A cancellation that fired before the first attempt resolved
    let (cancel, mut receiver) = cancellation();
    cancel.cancel();

    // WHEN: Polling a port nothing listens on
    let result = wait_until_ready("http://127.0.0.1:9", &mut receiver).await;

    // THEN: Should report cancellation, not keep retrying
    assert!(
        matches!(result, Err(ReadinessError::Cancelled { .. })),
        "Expected cancellation, got {result:?}"
    );
}
