// Prevents additional console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use demo::error::DemoError;
use demo::launcher;
use demo::logger::initialize as LoggerInitialize;
use demo::state::{AppState, StateCommand};

use common::ErrorLocation;

use std::fs::create_dir_all;

use log::{error, info, warn};
use tauri::{AppHandle, Manager, RunEvent, WindowEvent};

fn main() {
    let app = tauri::Builder::default()
        .setup(|app| {
            // Get app data directory for logs
            let log_dir = app.path().app_log_dir().map_err(|e| DemoError::Demo {
                message: format!("Failed to get log directory: {e}"),
                location: ErrorLocation::caller(),
            })?;

            create_dir_all(&log_dir).map_err(|e| DemoError::Demo {
                message: format!("Failed to create log directory: {e}"),
                location: ErrorLocation::caller(),
            })?;

            // Initialize logger FIRST
            LoggerInitialize(&log_dir)?;

            info!("Demo shell starting");
            info!("Log directory: {}", log_dir.display());

            app.manage(AppState::default());

            Ok(())
        })
        .on_window_event(|window, event| match event {
            WindowEvent::CloseRequested { api, .. } => {
                let app = window.app_handle().clone();
                let server_tracked = tauri::async_runtime::block_on(async {
                    app.state::<AppState>().server().await.is_some()
                });

                if server_tracked {
                    // Hold the window open until the server tree is
                    // confirmed dead, then close it for real.
                    api.prevent_close();

                    let window = window.clone();
                    tauri::async_runtime::spawn(async move {
                        if let Err(e) = launcher::shutdown(&app).await {
                            error!("{e}");
                        }
                        if let Err(e) = window.close() {
                            error!("Failed to close window: {e}");
                        }
                    });
                }
            }
            WindowEvent::Destroyed => {
                let app = window.app_handle().clone();
                tauri::async_runtime::spawn(async move {
                    let state = app.state::<AppState>();
                    if let Err(e) = state.update(StateCommand::WindowClosed).await {
                        warn!("Failed to record window close: {e}");
                    }
                });
            }
            _ => {}
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app, event| match event {
        RunEvent::Ready => spawn_launch(app),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows,
            ..
        } => {
            if !has_visible_windows {
                spawn_launch(app);
            }
        }
        RunEvent::ExitRequested { code, api, .. } => {
            // Staying resident without windows is the macOS convention;
            // everywhere else the app quits with its last window.
            #[cfg(target_os = "macos")]
            if code.is_none() {
                api.prevent_exit();
            }
            #[cfg(not(target_os = "macos"))]
            let _ = (code, api);
        }
        RunEvent::Exit => {
            // A quit during the polling phase still has a server to reap.
            let app = app.clone();
            tauri::async_runtime::block_on(async move {
                if let Err(e) = launcher::shutdown(&app).await {
                    error!("{e}");
                }
            });
        }
        _ => {}
    });
}

fn spawn_launch(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(e) = launcher::start(&app).await {
            // Fatal: a shell with no server has nothing to show.
            error!("{e}");
            app.exit(1);
        }
    });
}
