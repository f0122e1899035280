//! Orchestrates one launch: spawn the server, poll until it answers, put
//! the window on screen, and tear everything down in order on close.

use crate::error::DemoError;
use crate::state::{AppState, StateCommand};

use launcher_core::SERVER_URL;
use launcher_core::process::spawn::spawn_server;
use launcher_core::process::terminate::{Termination, terminate_tree};
use launcher_core::readiness::{cancellation, wait_until_ready};

use common::ErrorLocation;

use std::path::PathBuf;

use log::{error, info, warn};
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindowBuilder};

pub const WINDOW_LABEL: &str = "main";
const WINDOW_TITLE: &str = "Demo";
const WINDOW_WIDTH: f64 = 640.0;
const WINDOW_HEIGHT: f64 = 480.0;

/// Run one launch attempt end to end.
///
/// No-op when a launch is already underway (the activation path may call
/// this at any time). A spawn failure is returned to the caller, which
/// treats it as fatal; the error names the application root it spawned
/// from.
pub async fn start(app: &AppHandle) -> Result<(), DemoError> {
    let state = app.state::<AppState>();

    if !state.begin_launch().await.map_err(state_error)? {
        return Ok(());
    }

    let app_root = resolve_app_root(app)?;

    let server = spawn_server(&app_root).await.map_err(|e| DemoError::Core {
        message: e.to_string(),
        location: ErrorLocation::caller(),
    })?;

    let (poll_cancel, mut cancel_rx) = cancellation();
    state
        .update(StateCommand::ServerSpawned { server, poll_cancel })
        .await
        .map_err(state_error)?;

    if wait_until_ready(SERVER_URL, &mut cancel_rx).await.is_err() {
        // Cancelled by a teardown while the server was still booting; the
        // close path owns the cleanup.
        info!("Launch abandoned while waiting for the server");
        return Ok(());
    }

    open_window(app)?;
    state
        .update(StateCommand::WindowOpened)
        .await
        .map_err(state_error)?;

    Ok(())
}

/// Tear down the tracked server process tree, if any.
///
/// Cancels an in-flight readiness poll first, so a launch blocked in the
/// polling phase cannot leak its retry timer. Returns once termination is
/// confirmed. A termination failure is logged and the handle dropped
/// anyway: the window close is gated on this call finishing, not on the
/// kill succeeding.
pub async fn shutdown(app: &AppHandle) -> Result<(), DemoError> {
    let state = app.state::<AppState>();

    let Some(server) = state.close_requested().await.map_err(state_error)? else {
        return Ok(());
    };

    let pid = server.pid;
    info!("Terminating server process tree (PID: {pid})");
    state
        .update(StateCommand::TerminatingServer)
        .await
        .map_err(state_error)?;

    let outcome = tauri::async_runtime::spawn_blocking(move || terminate_tree(pid))
        .await
        .map_err(|e| DemoError::Demo {
            message: format!("Termination task failed: {e}"),
            location: ErrorLocation::caller(),
        })?;

    match outcome {
        Ok(termination) => {
            if termination == Termination::Forced {
                warn!("Server process tree required a force kill (PID: {pid})");
            }
            info!("Server process killed");
        }
        Err(e) => error!("Server process tree may still be running (PID: {pid}): {e}"),
    }

    state
        .update(StateCommand::ServerTerminated)
        .await
        .map_err(state_error)?;

    Ok(())
}

fn open_window(app: &AppHandle) -> Result<(), DemoError> {
    let url: Url = SERVER_URL.parse().map_err(|e| DemoError::Window {
        message: format!("Invalid server URL {SERVER_URL}: {e}"),
        location: ErrorLocation::caller(),
    })?;

    let window = WebviewWindowBuilder::new(app, WINDOW_LABEL, WebviewUrl::External(url))
        .title(WINDOW_TITLE)
        .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .build()
        .map_err(|e| DemoError::Window {
            message: format!("Failed to create window: {e}"),
            location: ErrorLocation::caller(),
        })?;

    window.open_devtools();

    info!("Window open at {SERVER_URL}");
    Ok(())
}

/// The application root is the bundle's resource directory; the server
/// ships under demo/bin inside it.
fn resolve_app_root(app: &AppHandle) -> Result<PathBuf, DemoError> {
    app.path().resource_dir().map_err(|e| DemoError::Demo {
        message: format!("Failed to resolve application root: {e}"),
        location: ErrorLocation::caller(),
    })
}

fn state_error(message: String) -> DemoError {
    DemoError::Demo {
        message,
        location: ErrorLocation::caller(),
    }
}
