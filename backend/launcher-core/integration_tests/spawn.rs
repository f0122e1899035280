use launcher_core::error::spawn::SpawnError;
use launcher_core::process::spawn::spawn_server;

use tempfile::tempdir;

// ============================================================================
// Public API tests for server spawning
// ============================================================================

/// **VALUE**: Verifies that spawning from a root without the bundled server fails
/// with an error naming that root.
///
/// **WHY THIS MATTERS**: A spawn failure is fatal and its log line is the only
/// diagnostic the user gets. If the message does not say where the launcher
/// looked, a broken install is undebuggable.
///
/// **BUG THIS CATCHES**: Would catch the error message losing the application
/// root path, or the failure being swallowed into a retry.
#[tokio::test]
async fn given_root_without_bundled_server_when_spawning_then_errors_with_path() {
    // GIVEN: An application root with nothing under demo/bin
    let root = tempdir().expect("create temp root");

    // WHEN: Spawning
    let result = spawn_server(root.path()).await;

    // THEN: A spawn error naming the root
    match result {
        Err(SpawnError::Spawn { message, .. }) => {
            assert!(
                message.contains(&root.path().display().to_string()),
                "Message should name the application root: {message}"
            );
        }
        other => panic!("Expected SpawnError::Spawn, got {other:?}"),
    }
}

/// **VALUE**: Verifies the full spawn-then-terminate cycle against a real process.
///
/// **WHY THIS MATTERS**: This is the launcher's whole job in miniature: start the
/// bundled executable, get a live PID back, and be able to reap it later.
///
/// **BUG THIS CATCHES**: Would catch the spawn path returning before the process
/// exists, a PID that does not match the running process, or teardown failing
/// against a process we ourselves started.
#[cfg(unix)]
#[tokio::test]
async fn given_bundled_executable_when_spawned_then_pid_is_live_until_terminated() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use launcher_core::process::terminate::{Termination, terminate_tree};

    // GIVEN: A temp application root with an executable at demo/bin/demo
    let root = tempdir().expect("create temp root");
    let bin_dir = root.path().join("demo/bin");
    fs::create_dir_all(&bin_dir).expect("create bin dir");

    let executable = bin_dir.join("demo");
    fs::write(&executable, "#!/bin/sh\nsleep 30\n").expect("write stub server");
    fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).expect("mark executable");

    // WHEN: Spawning
    let handle = spawn_server(root.path()).await.expect("spawn stub server");

    // THEN: A real PID that termination can reap
    assert!(handle.pid > 0, "Should report a real PID");

    let outcome = terminate_tree(handle.pid).expect("tree teardown should succeed");
    assert!(
        matches!(outcome, Termination::Graceful | Termination::Forced),
        "A live tree should be reaped, got {outcome:?}"
    );
}
