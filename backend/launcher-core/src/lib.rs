//! Lifecycle plumbing for the bundled Demo server.
//!
//! Everything that happens below the window lives here:
//! - building the platform-specific launch command and spawning the server
//! - probing its HTTP endpoint until it answers
//! - tearing down the whole process tree when the shell closes

pub mod error;
pub mod process;
pub mod readiness;

#[cfg(test)]
mod tests;

pub const SERVER_HOSTNAME: &str = "localhost";
pub const SERVER_PORT: u16 = 8080;
pub const SERVER_URL: &str =
    const_format::concatcp!("http://", SERVER_HOSTNAME, ":", SERVER_PORT);

/// Path of the bundled server directory, relative to the application root.
pub const SERVER_BIN_DIR: &str = "demo/bin";
/// Server executable, invoked directly on non-Windows platforms.
pub const SERVER_EXECUTABLE: &str = "demo";
/// Batch file, invoked through cmd.exe on Windows.
pub const SERVER_BATCH_FILE: &str = "demo.bat";
