use common::ErrorLocation;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the shell.
///
/// Everything here ends up as a console log line; the Serialize derive
/// keeps the type usable across the Tauri boundary.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DemoError {
    /// Error from the shell's own wiring (logging, state, paths)
    #[error("Demo Error: {message} {location}")]
    Demo {
        message: String,
        location: ErrorLocation,
    },

    /// Error from launcher-core operations (spawn, readiness, terminate)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Window creation or teardown failed
    #[error("Window Error: {message} {location}")]
    Window {
        message: String,
        location: ErrorLocation,
    },
}
