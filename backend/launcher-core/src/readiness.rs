//! Fixed-interval readiness probe for the server endpoint.
//!
//! Any resolved HTTP response counts as readiness, whatever the status
//! code: the server answered, so it is up. Only transport-level failures
//! (connection refused while the server boots) keep the loop waiting.

use crate::error::readiness::ReadinessError;

use common::ErrorLocation;

use std::time::Duration;

use log::{debug, info};
use reqwest::Client;
use tokio::sync::watch;
use tokio::time::sleep as TokioSleep;

/// Delay between two consecutive probe attempts.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Cancels an in-flight readiness poll from the teardown path.
#[derive(Debug)]
pub struct PollCancel {
    cancelled: watch::Sender<bool>,
}

impl PollCancel {
    pub fn cancel(&self) {
        let _ = self.cancelled.send(true);
    }
}

/// Create a linked cancel handle / receiver pair for one poll loop.
pub fn cancellation() -> (PollCancel, watch::Receiver<bool>) {
    let (cancelled, receiver) = watch::channel(false);
    (PollCancel { cancelled }, receiver)
}

async fn cancelled(receiver: &mut watch::Receiver<bool>) {
    if receiver.wait_for(|flag| *flag).await.is_err() {
        // The cancel handle was dropped without firing; this poll can only
        // end by succeeding.
        std::future::pending::<()>().await;
    }
}

/// Poll `url` until it resolves to any HTTP response.
///
/// Attempts are strictly sequential: each one runs to resolution before
/// the next is scheduled, with exactly [`POLL_INTERVAL`] in between. There
/// is no attempt cap and no per-attempt timeout; the loop runs until the
/// server answers or `cancel` fires.
pub async fn wait_until_ready(
    url: &str,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), ReadinessError> {
    let client = Client::new();

    loop {
        let outcome = tokio::select! {
            outcome = client.get(url).send() => outcome,
            _ = cancelled(cancel) => return Err(cancelled_while(url, "probing")),
        };

        match outcome {
            Ok(response) => {
                debug!(
                    "Readiness probe for {url} answered with status {}",
                    response.status()
                );
                info!("Server started!");
                return Ok(());
            }
            Err(e) => {
                debug!("Readiness probe for {url} failed: {e}");
                info!("Waiting for the server start...");
            }
        }

        tokio::select! {
            _ = TokioSleep(POLL_INTERVAL) => {}
            _ = cancelled(cancel) => return Err(cancelled_while(url, "waiting to retry")),
        }
    }
}

fn cancelled_while(url: &str, stage: &str) -> ReadinessError {
    debug!("Readiness poll for {url} cancelled while {stage}");
    ReadinessError::Cancelled {
        message: format!("Readiness poll for {url} cancelled while {stage}"),
        location: ErrorLocation::caller(),
    }
}
