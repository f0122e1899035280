use launcher_core::process::spawn::ServerHandle;
use launcher_core::readiness::PollCancel;

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};

/// Phases of a single launch attempt.
///
/// `start` only claims the machine from `NotStarted` or `Closed`; every
/// other phase means a launch is already underway and a new request is
/// ignored. This is what makes the activation path safely re-entrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    NotStarted,
    Spawning,
    Polling,
    WindowOpen,
    CloseRequested,
    TerminatingServer,
    Closed,
}

/// Commands that mutate launch state.
///
/// All mutations go through the state actor via these commands. This
/// serializes them and keeps the phase machine and the server handle in
/// step with each other.
#[derive(Debug)]
pub enum StateCommand {
    /// Claim the machine for a new launch attempt. Replies `true` when it
    /// was idle and the claim succeeded.
    BeginLaunch { reply: oneshot::Sender<bool> },

    /// The server process is up and the readiness poll is starting.
    ServerSpawned {
        server: ServerHandle,
        poll_cancel: PollCancel,
    },

    /// First successful probe; the window is on screen.
    WindowOpened,

    /// The window (or the whole app) was asked to close. Cancels any
    /// in-flight poll and replies with the tracked server, if one exists.
    CloseRequested {
        reply: oneshot::Sender<Option<ServerHandle>>,
    },

    /// Process-tree termination is in flight.
    TerminatingServer,

    /// Termination confirmed; the server handle is dropped.
    ServerTerminated,

    /// The window is gone.
    WindowClosed,
}

#[derive(Debug, Clone)]
struct LaunchSnapshot {
    phase: LaunchPhase,
    server: Option<ServerHandle>,
}

/// Launch state manager.
///
/// Uses an actor to serialize every mutation. Reads go through a shared
/// `RwLock` snapshot, so they never contend with the command channel.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send state mutation commands to the actor
    command_tx: Arc<Mutex<Option<mpsc::Sender<StateCommand>>>>,

    /// Shared read-only view of the launch state
    snapshot: Arc<RwLock<LaunchSnapshot>>,

    /// Tracks whether the actor has been spawned yet
    actor_init: Arc<Mutex<bool>>,
}

impl AppState {
    /// Create a new state manager.
    ///
    /// The actor is lazily spawned on first use within an async context.
    pub fn new() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            snapshot: Arc::new(RwLock::new(LaunchSnapshot {
                phase: LaunchPhase::NotStarted,
                server: None,
            })),
            actor_init: Arc::new(Mutex::new(false)),
        }
    }

    /// Send a state command.
    ///
    /// Returns an error if the state actor has died (should never happen).
    pub async fn update(&self, cmd: StateCommand) -> Result<(), String> {
        self.ensure_actor().await;

        let tx_guard = self.command_tx.lock().await;
        let tx = tx_guard.as_ref().ok_or("Actor not initialized")?;
        tx.send(cmd)
            .await
            .map_err(|e| format!("State actor died: {}", e))
    }

    /// Claim the machine for a new launch.
    ///
    /// Returns `false` (leaving the state untouched) when a launch is
    /// already underway.
    pub async fn begin_launch(&self) -> Result<bool, String> {
        let (reply, claimed) = oneshot::channel();
        self.update(StateCommand::BeginLaunch { reply }).await?;
        claimed
            .await
            .map_err(|e| format!("State actor dropped reply: {e}"))
    }

    /// Report a close request.
    ///
    /// Cancels any in-flight readiness poll and returns the tracked server
    /// when one still needs terminating.
    pub async fn close_requested(&self) -> Result<Option<ServerHandle>, String> {
        let (reply, server) = oneshot::channel();
        self.update(StateCommand::CloseRequested { reply }).await?;
        server
            .await
            .map_err(|e| format!("State actor dropped reply: {e}"))
    }

    pub async fn phase(&self) -> LaunchPhase {
        self.snapshot.read().await.phase
    }

    /// Current server handle (read-only).
    pub async fn server(&self) -> Option<ServerHandle> {
        self.snapshot.read().await.server.clone()
    }

    /// Ensure the actor is spawned (called lazily from async contexts).
    async fn ensure_actor(&self) {
        let mut init_guard = self.actor_init.lock().await;
        if !*init_guard {
            let (tx, rx) = mpsc::channel(16);
            let snapshot = Arc::clone(&self.snapshot);

            // Store tx before spawning so no command can observe a gap
            let mut tx_guard = self.command_tx.lock().await;
            *tx_guard = Some(tx);
            drop(tx_guard);

            tokio::spawn(state_actor(rx, snapshot));
            *init_guard = true;
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state actor task.
///
/// Owns the poll-cancel handle and processes commands sequentially, so the
/// phase machine can never be raced by concurrent launch and close paths.
async fn state_actor(
    mut command_rx: mpsc::Receiver<StateCommand>,
    snapshot: Arc<RwLock<LaunchSnapshot>>,
) {
    info!("State actor started");

    // Never leaves the actor; close paths reach it through CloseRequested.
    let mut poll_cancel: Option<PollCancel> = None;

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            StateCommand::BeginLaunch { reply } => {
                let mut snap = snapshot.write().await;
                let claimed = matches!(
                    snap.phase,
                    LaunchPhase::NotStarted | LaunchPhase::Closed
                );

                if claimed {
                    info!("Launch claimed");
                    snap.phase = LaunchPhase::Spawning;
                } else {
                    warn!("Launch requested while {:?}, ignoring", snap.phase);
                }

                let _ = reply.send(claimed);
            }
            StateCommand::ServerSpawned {
                server,
                poll_cancel: cancel,
            } => {
                let mut snap = snapshot.write().await;

                if snap.phase != LaunchPhase::Spawning {
                    warn!("Server spawned while {:?}", snap.phase);
                }
                if let Some(ref existing) = snap.server {
                    warn!("Replacing tracked server (PID {})", existing.pid);
                }

                info!("Tracking server: PID={}", server.pid);
                snap.server = Some(server);
                snap.phase = LaunchPhase::Polling;
                poll_cancel = Some(cancel);
            }
            StateCommand::WindowOpened => {
                let mut snap = snapshot.write().await;

                if snap.server.is_none() {
                    warn!("Window opened without a tracked server");
                }

                snap.phase = LaunchPhase::WindowOpen;
                // The poll resolved; nothing left to cancel.
                poll_cancel = None;
            }
            StateCommand::CloseRequested { reply } => {
                if let Some(cancel) = poll_cancel.take() {
                    info!("Cancelling in-flight readiness poll");
                    cancel.cancel();
                }

                let mut snap = snapshot.write().await;
                let server = snap.server.clone();
                if server.is_some() {
                    snap.phase = LaunchPhase::CloseRequested;
                }

                let _ = reply.send(server);
            }
            StateCommand::TerminatingServer => {
                let mut snap = snapshot.write().await;
                snap.phase = LaunchPhase::TerminatingServer;
            }
            StateCommand::ServerTerminated => {
                let mut snap = snapshot.write().await;
                match snap.server.take() {
                    Some(server) => info!("Dropped server handle: PID={}", server.pid),
                    None => warn!("Server terminated but none was tracked"),
                }
            }
            StateCommand::WindowClosed => {
                let mut snap = snapshot.write().await;

                if snap.server.is_some() {
                    warn!("Window closed while a server is still tracked");
                }

                snap.phase = LaunchPhase::Closed;
            }
        }
    }

    warn!("State actor stopped - this should not happen during normal operation");
}
