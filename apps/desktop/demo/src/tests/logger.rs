// Unit tests for logger initialization
// The logger is process-global, so one test drives every behavior

use crate::logger::initialize;

use tempfile::tempdir;

/// **VALUE**: Verifies that initialization succeeds, is idempotent, and creates
/// the log file.
///
/// **WHY THIS MATTERS**: Initialization runs inside Tauri's setup hook; a panic
/// or error there kills the app before any window exists. Repeat calls must be
/// harmless because the setup hook has no single-call guarantee across the
/// app's lifetime.
///
/// **BUG THIS CATCHES**: Would catch removal of the Once/AtomicBool guards
/// (fern panics when a second global logger is applied) and regressions in the
/// file-dispatch half of the configuration.
#[test]
fn given_valid_dir_when_initialized_twice_then_both_calls_succeed() {
    // GIVEN: A writable log directory
    let dir = tempdir().expect("create temp log dir");

    // WHEN: Initializing twice
    let first = initialize(dir.path());
    let second = initialize(dir.path());

    // THEN: Both succeed, and the log file exists
    assert!(first.is_ok(), "First initialization should succeed: {first:?}");
    assert!(
        second.is_ok(),
        "Repeat initialization should be a no-op: {second:?}"
    );
    assert!(
        dir.path().join("demo.log").exists(),
        "Log file should be created"
    );
}
