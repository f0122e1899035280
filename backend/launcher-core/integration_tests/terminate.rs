use launcher_core::process::terminate::{Termination, terminate_tree};

use std::process::Command as StdCommand;
use std::thread::sleep;
use std::time::Duration;

use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

// ============================================================================
// Tree termination tests against real child processes
// ============================================================================

#[cfg(unix)]
fn spawn_sleeper() -> std::process::Child {
    StdCommand::new("sleep")
        .arg("30")
        .spawn()
        .expect("spawn sleeper")
}

#[cfg(windows)]
fn spawn_sleeper() -> std::process::Child {
    StdCommand::new("cmd.exe")
        .args(["/c", "timeout /t 30 /nobreak"])
        .spawn()
        .expect("spawn sleeper")
}

/// Gone, or a zombie waiting on its parent - either way no longer running.
fn is_gone(sys: &System, pid: u32) -> bool {
    match sys.process(Pid::from_u32(pid)) {
        None => true,
        Some(process) => matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead),
    }
}

/// **VALUE**: Verifies that terminating a live child makes its PID disappear.
///
/// **WHY THIS MATTERS**: This is the teardown half of the close sequence; the
/// window is only allowed to close after this works.
///
/// **BUG THIS CATCHES**: Would catch the signal being sent to the wrong PID, or
/// the verification loop reporting success while the process still runs.
#[test]
fn given_live_process_when_terminated_then_pid_disappears() {
    // GIVEN: A live child
    let mut child = spawn_sleeper();
    let pid = child.id();

    // WHEN: Terminating its tree
    let outcome = terminate_tree(pid).expect("termination should succeed");

    // THEN: Confirmed dead
    assert!(
        matches!(outcome, Termination::Graceful | Termination::Forced),
        "A live process should be reaped, got {outcome:?}"
    );

    let _ = child.wait();

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);
    assert!(is_gone(&sys, pid), "PID {pid} should be gone");
}

/// **VALUE**: Verifies that termination takes the whole tree down, not just the
/// process we spawned.
///
/// **WHY THIS MATTERS**: The bundled server is a wrapper that forks the real
/// workload. Killing only the wrapper would orphan the workload and leave the
/// port occupied for the next launch.
///
/// **BUG THIS CATCHES**: Would catch the child-collection walk being skipped or
/// only covering direct children of the root.
#[cfg(unix)]
#[test]
fn given_process_with_children_when_terminated_then_whole_tree_is_reaped() {
    // GIVEN: A shell that forks a child sleeper, then becomes a sleeper itself
    let mut child = StdCommand::new("sh")
        .args(["-c", "sleep 30 & exec sleep 31"])
        .spawn()
        .expect("spawn shell tree");
    let root_pid = child.id();

    // Give the shell a moment to fork
    sleep(Duration::from_millis(300));

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);
    let forked = sys
        .processes()
        .iter()
        .find(|(_, process)| process.parent() == Some(Pid::from_u32(root_pid)))
        .map(|(pid, _)| pid.as_u32())
        .expect("shell should have forked a sleeper");

    // WHEN: Terminating from the root
    let outcome = terminate_tree(root_pid).expect("tree termination should succeed");
    let _ = child.wait();

    // THEN: Root and forked child are both gone
    assert!(
        matches!(outcome, Termination::Graceful | Termination::Forced),
        "A live tree should be reaped, got {outcome:?}"
    );

    sys.refresh_processes(ProcessesToUpdate::All, true);
    assert!(is_gone(&sys, root_pid), "Root PID {root_pid} should be gone");
    assert!(is_gone(&sys, forked), "Forked PID {forked} should be gone");
}

/// **VALUE**: Verifies that a process that already exited reports `AlreadyExited`.
///
/// **WHY THIS MATTERS**: Servers crash. The close path must not treat an
/// already-dead server as a teardown failure.
///
/// **BUG THIS CATCHES**: Would catch the exited case surfacing as
/// `StillRunning`, which would log an error on every close after a crash.
#[test]
fn given_exited_process_when_terminated_then_reports_already_exited() {
    // GIVEN: A child that ran to completion and was reaped
    #[cfg(unix)]
    let mut child = StdCommand::new("true").spawn().expect("spawn no-op");
    #[cfg(windows)]
    let mut child = StdCommand::new("cmd.exe")
        .args(["/c", "exit"])
        .spawn()
        .expect("spawn no-op");

    let pid = child.id();
    child.wait().expect("reap no-op");

    // WHEN: Terminating its tree
    let outcome = terminate_tree(pid).expect("termination of an exited process should not error");

    // THEN: Nothing to do
    assert_eq!(outcome, Termination::AlreadyExited);
}
