use common::ErrorLocation;

use std::error::Error as StdError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SpawnError {
    #[error("Spawn Error: {message} {location}")]
    Spawn {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The OS accepted the spawn but returned no process identifier,
    /// which means the child was gone before we could track it.
    #[error("No Handle Error: {message} {location}")]
    NoHandle {
        message: String,
        location: ErrorLocation,
    },
}
