use crate::error::spawn::SpawnError;
#[cfg(windows)]
use crate::{SERVER_BATCH_FILE, SERVER_BIN_DIR};
#[cfg(not(windows))]
use crate::{SERVER_BIN_DIR, SERVER_EXECUTABLE};

use common::ErrorLocation;

use std::path::Path;
use std::process::Stdio;

use log::{info, trace};
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::Child as TokioChild;
use tokio::process::Command as TokioCommand;
use tokio::spawn as TokioSpawn;

/// Identity of the spawned server process.
///
/// The OS child handle is released right after spawning; teardown signals
/// the whole process tree by PID instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHandle {
    pub pid: u32,
}

#[cfg(windows)]
pub(crate) fn build_server_command(app_root: &Path) -> TokioCommand {
    // Batch files are not executables; they go through the shell, rooted
    // in the server's own directory.
    let mut cmd = TokioCommand::new("cmd.exe");
    cmd.arg("/c")
        .arg(SERVER_BATCH_FILE)
        .current_dir(app_root.join(SERVER_BIN_DIR))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[cfg(not(windows))]
pub(crate) fn build_server_command(app_root: &Path) -> TokioCommand {
    let mut cmd = TokioCommand::new(app_root.join(SERVER_BIN_DIR).join(SERVER_EXECUTABLE));
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd
}

/// Spawn the bundled server from the application root.
///
/// Uses the platform-specific invocation (`cmd.exe /c demo.bat` on Windows,
/// the executable itself everywhere else). The child's output streams are
/// tapped into the log, never parsed or reacted to.
///
/// # Returns
///
/// * `Ok(ServerHandle)` - Server process is running
/// * `Err(SpawnError)` - Process creation failed; the message names the
///   application root so the fatal log pinpoints the broken install
pub async fn spawn_server(app_root: &Path) -> Result<ServerHandle, SpawnError> {
    let mut child = build_server_command(app_root)
        .spawn()
        .map_err(|e| SpawnError::Spawn {
            message: format!("Unable to start server from {}: {e}", app_root.display()),
            location: ErrorLocation::caller(),
            source: Box::new(e),
        })?;

    let pid = child.id().ok_or_else(|| SpawnError::NoHandle {
        message: format!(
            "Server from {} exited before it could be tracked",
            app_root.display()
        ),
        location: ErrorLocation::caller(),
    })?;

    forward_output(&mut child);

    info!("Server PID: {pid}");

    // Dropping the handle detaches the child; the runtime reaps it when it
    // exits, and teardown signals the tree by PID.
    drop(child);

    Ok(ServerHandle { pid })
}

/// Attach passive line loggers to the child's output streams.
fn forward_output(child: &mut TokioChild) {
    if let Some(stdout) = child.stdout.take() {
        TokioSpawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!("Server: {line}");
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        TokioSpawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                trace!("Server stderr: {line}");
            }
        });
    }
}
