use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TerminateError {
    /// Part of the process tree survived SIGTERM, the SIGKILL escalation,
    /// and both verification windows.
    #[error("Still Running Error: {message} {location}")]
    StillRunning {
        message: String,
        location: ErrorLocation,
    },
}
