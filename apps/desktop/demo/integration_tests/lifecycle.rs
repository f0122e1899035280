use demo::state::{AppState, StateCommand};

use launcher_core::process::spawn::{ServerHandle, spawn_server};
use launcher_core::process::terminate::{Termination, terminate_tree};
use launcher_core::readiness::cancellation;

use tempfile::tempdir;

// ============================================================================
// Integration tests for state + launcher-core
// These test the two crates together, short of a running Tauri app
// ============================================================================

/// **VALUE**: Tests the fatal-launch path: spawning from a root with no bundled
/// server yields an error that names the root.
///
/// **WHY THIS MATTERS**: This is the exact failure the shell hits on a broken
/// install, and the resulting log line is the only diagnostic anyone gets
/// before the app exits.
///
/// **BUG THIS CATCHES**: Would catch launcher-core's error message drifting so
/// the shell's fatal log stops naming where it looked.
#[tokio::test]
async fn given_empty_app_root_when_spawning_then_fatal_error_names_root() {
    // GIVEN: An application root with no server bundle
    let root = tempdir().expect("create temp root");

    // WHEN: Spawning the server the way start() does
    let result = spawn_server(root.path()).await;

    // THEN: The error display carries the root path
    let err = result.expect_err("spawn must fail without a bundle");
    assert!(
        err.to_string()
            .contains(&root.path().display().to_string()),
        "Fatal error should name the root: {err}"
    );
}

/// **VALUE**: Tests the interactive-close sequence against a real process:
/// close hands back the handle, termination reaps the PID, confirmation drops
/// the handle.
///
/// **WHY THIS MATTERS**: This is the launcher's core ordering guarantee -
/// server teardown strictly precedes the window going away - exercised with a
/// live child instead of a stub.
///
/// **BUG THIS CATCHES**: Would catch the state machine and the terminator
/// disagreeing about who owns the handle (double kill, or a close that drops
/// the handle before the process is dead).
#[cfg(unix)]
#[tokio::test]
async fn given_tracked_server_when_close_runs_then_process_reaped_before_handle_drop() {
    use std::process::Command as StdCommand;

    // GIVEN: A live child tracked as the server
    let child = StdCommand::new("sleep")
        .arg("30")
        .spawn()
        .expect("spawn sleeper");
    let pid = child.id();

    let state = AppState::new();
    assert!(state.begin_launch().await.expect("actor should reply"));

    let (poll_cancel, _cancel_rx) = cancellation();
    state
        .update(StateCommand::ServerSpawned {
            server: ServerHandle { pid },
            poll_cancel,
        })
        .await
        .expect("track server");

    // WHEN: The close path runs, the way shutdown() drives it
    let server = state
        .close_requested()
        .await
        .expect("actor should reply")
        .expect("close should hand back the tracked server");

    let outcome = terminate_tree(server.pid).expect("termination should succeed");
    assert!(
        matches!(outcome, Termination::Graceful | Termination::Forced),
        "A live server should be reaped, got {outcome:?}"
    );

    state
        .update(StateCommand::ServerTerminated)
        .await
        .expect("confirm termination");
    tokio::task::yield_now().await;

    // THEN: The handle is gone only after the process is
    assert!(
        state.server().await.is_none(),
        "Handle must be dropped after confirmation"
    );
}

/// **VALUE**: Tests that concurrent launch claims cannot deadlock or both win,
/// under a bounded timeout.
///
/// **WHY THIS MATTERS**: Ready and Reopen both route into the same claim; this
/// is the integration-level proof that the actor serializes them.
///
/// **BUG THIS CATCHES**: Would catch a deadlock between the claim reply and
/// the actor's own locks, or the guard admitting two launches.
#[tokio::test]
async fn given_racing_claims_when_executed_then_no_deadlock_and_single_winner() {
    use std::time::Duration;

    // GIVEN: A shared machine
    let state = AppState::new();
    let first = state.clone();
    let second = state.clone();

    // WHEN: Two tasks claim concurrently
    let claim_one = tokio::spawn(async move { first.begin_launch().await });
    let claim_two = tokio::spawn(async move { second.begin_launch().await });

    let result = tokio::time::timeout(Duration::from_secs(2), async {
        let (one, two) = tokio::join!(claim_one, claim_two);
        (
            one.expect("task one should finish")
                .expect("actor should reply"),
            two.expect("task two should finish")
                .expect("actor should reply"),
        )
    })
    .await;

    // THEN: Both settle, exactly one wins
    let (one, two) = result.expect("claims should complete within 2 seconds (no deadlock)");
    assert!(
        one ^ two,
        "Exactly one claim may win, got ({one}, {two})"
    );
}
