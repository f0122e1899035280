use crate::error::terminate::TerminateError;

use common::ErrorLocation;

use std::thread::sleep;
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, trace, warn};
use sysinfo::{Pid, Process, ProcessStatus, ProcessesToUpdate, Signal, System};

const KILL_VERIFY_MAX_ELAPSED: Duration = Duration::from_secs(5);

/// Outcome of a process-tree termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every process in the tree exited after the termination signal.
    Graceful,
    /// At least one process had to be force-killed.
    Forced,
    /// The root process was already gone.
    AlreadyExited,
}

fn refresh(sys: &mut System) {
    sys.refresh_processes(ProcessesToUpdate::All, true);
}

/// A zombie is dead for our purposes; it only lingers until its parent
/// reaps it, and no signal will make it any deader.
fn is_live(process: &Process) -> bool {
    !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
}

/// Collect `root` and every transitive child, parents before children.
fn collect_tree(sys: &System, root: Pid) -> Vec<Pid> {
    let mut tree = vec![root];
    let mut index = 0;

    while index < tree.len() {
        let parent = tree[index];
        for (pid, process) in sys.processes() {
            if process.parent() == Some(parent) && !tree.contains(pid) {
                tree.push(*pid);
            }
        }
        index += 1;
    }

    tree
}

/// Signal every member, deepest first, so the server cannot restart a
/// child we already signalled. Returns whether any member needed the
/// platform fallback kill instead of `signal`.
fn signal_members(sys: &System, members: &[Pid], signal: Signal) -> bool {
    let mut used_fallback = false;

    for member in members.iter().rev() {
        if let Some(process) = sys.process(*member) {
            match process.kill_with(signal) {
                Some(sent) => trace!("Sent {signal:?} to PID {member}: success={sent}"),
                None => {
                    let killed = process.kill();
                    trace!("Platform lacks {signal:?}, sent plain kill to PID {member}: success={killed}");
                    used_fallback = true;
                }
            }
        }
    }

    used_fallback
}

fn survivors(sys: &mut System, members: &[Pid]) -> Vec<Pid> {
    refresh(sys);
    members
        .iter()
        .copied()
        .filter(|member| sys.process(*member).map(is_live).unwrap_or(false))
        .collect()
}

/// Wait for the members to disappear, polling with exponential backoff for
/// up to [`KILL_VERIFY_MAX_ELAPSED`]. Returns whatever is still alive.
fn wait_for_exit(sys: &mut System, members: &[Pid]) -> Vec<Pid> {
    let mut backoff = ExponentialBackoff {
        max_elapsed_time: Some(KILL_VERIFY_MAX_ELAPSED),
        ..Default::default()
    };

    loop {
        let alive = survivors(sys, members);
        if alive.is_empty() {
            return alive;
        }

        match backoff.next_backoff() {
            Some(duration) => {
                trace!(
                    "{} processes still alive, retrying after {duration:?}",
                    alive.len()
                );
                sleep(duration);
            }
            None => return alive,
        }
    }
}

/// Terminate the whole process tree rooted at `pid`.
///
/// Sends a termination signal to every member, verifies extinction with
/// backoff, and escalates survivors to a force kill with one more
/// verification window. Blocks while verifying; run it on a blocking
/// thread from async contexts.
///
/// # Returns
///
/// * `Ok(Termination)` - The tree is gone (or never existed)
/// * `Err(TerminateError)` - Something survived even the escalation
pub fn terminate_tree(pid: u32) -> Result<Termination, TerminateError> {
    let root = Pid::from_u32(pid);
    let mut sys = System::new_all();
    refresh(&mut sys);

    if !sys.process(root).map(is_live).unwrap_or(false) {
        debug!("Process {pid} not found, nothing to terminate");
        return Ok(Termination::AlreadyExited);
    }

    let tree = collect_tree(&sys, root);
    debug!(
        "Terminating process tree rooted at {pid} ({} processes)",
        tree.len()
    );

    let used_fallback = signal_members(&sys, &tree, Signal::Term);

    let alive = wait_for_exit(&mut sys, &tree);
    if alive.is_empty() {
        return Ok(if used_fallback {
            Termination::Forced
        } else {
            Termination::Graceful
        });
    }

    warn!(
        "{} processes survived the termination signal, escalating to a force kill",
        alive.len()
    );
    signal_members(&sys, &alive, Signal::Kill);

    let alive = wait_for_exit(&mut sys, &alive);
    if alive.is_empty() {
        return Ok(Termination::Forced);
    }

    Err(TerminateError::StillRunning {
        message: format!(
            "{} processes in the tree rooted at {pid} survived the force kill",
            alive.len()
        ),
        location: ErrorLocation::caller(),
    })
}
