// Unit tests for tree termination edge cases
// Tests against real child processes live in integration_tests/terminate.rs

use crate::process::terminate::{Termination, terminate_tree};

/// **VALUE**: Verifies that terminating a PID that does not exist reports
/// `AlreadyExited` instead of erroring.
///
/// **WHY THIS MATTERS**: The close path runs termination unconditionally when a
/// server handle is tracked. If the server crashed on its own beforehand, the
/// close must still complete quietly.
///
/// **BUG THIS CATCHES**: Would catch the missing-process case being folded into
/// the `StillRunning` failure path, which would log a scary error on every
/// close after a server crash.
#[test]
fn given_unused_pid_when_terminated_then_reports_already_exited() {
    // GIVEN: A PID far outside any real allocation range
    let pid = u32::MAX - 1;

    // WHEN: Terminating its (nonexistent) tree
    let outcome = terminate_tree(pid).expect("termination of a dead tree should not error");

    // THEN: Nothing to do
    assert_eq!(outcome, Termination::AlreadyExited);
}
