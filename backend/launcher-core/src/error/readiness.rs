use common::ErrorLocation;

use thiserror::Error as ThisError;

/// The readiness poll has no failure mode of its own: transport errors are
/// the expected boot-time state and are retried forever. The only way out
/// besides success is an explicit cancellation from the teardown path.
#[derive(Debug, ThisError)]
pub enum ReadinessError {
    #[error("Cancelled Error: {message} {location}")]
    Cancelled {
        message: String,
        location: ErrorLocation,
    },
}
