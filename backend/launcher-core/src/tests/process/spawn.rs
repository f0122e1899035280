// Unit tests for the platform-specific server command
// Spawn behavior against a real filesystem is covered in integration_tests/spawn.rs

use crate::process::spawn::build_server_command;
#[cfg(windows)]
use crate::{SERVER_BATCH_FILE, SERVER_BIN_DIR};
#[cfg(not(windows))]
use crate::{SERVER_BIN_DIR, SERVER_EXECUTABLE};

use std::path::Path;

/// **VALUE**: Verifies that non-Windows platforms invoke the bundled executable directly.
///
/// **WHY THIS MATTERS**: The whole launch sequence hinges on this one command being
/// right. A wrong program path means the spawn fails at startup on every install.
///
/// **BUG THIS CATCHES**: Would catch a refactor that changes the bundled layout
/// constants or accidentally routes the direct invocation through a shell.
#[cfg(not(windows))]
#[test]
fn given_app_root_when_command_built_then_invokes_bundled_executable_directly() {
    // GIVEN: An application root
    let app_root = Path::new("/opt/demo-shell");

    // WHEN: Building the spawn command
    let cmd = build_server_command(app_root);

    // THEN: Should execute <root>/demo/bin/demo with no arguments
    let program = cmd.as_std().get_program();
    assert_eq!(
        Path::new(program),
        app_root.join(SERVER_BIN_DIR).join(SERVER_EXECUTABLE),
        "Should invoke the bundled executable directly"
    );
    assert_eq!(
        cmd.as_std().get_args().count(),
        0,
        "Direct invocation takes no arguments"
    );
}

/// **VALUE**: Verifies that Windows routes the batch file through cmd.exe with the
/// right working directory.
///
/// **WHY THIS MATTERS**: Batch files cannot be executed directly; without the shell
/// indirection (and the server's own directory as cwd) the spawn fails or the server
/// cannot find its files.
///
/// **BUG THIS CATCHES**: Would catch dropping the `/c` flag, the batch-file name, or
/// the working-directory override.
#[cfg(windows)]
#[test]
fn given_app_root_when_command_built_then_runs_batch_file_through_cmd() {
    // GIVEN: An application root
    let app_root = Path::new(r"C:\demo-shell");

    // WHEN: Building the spawn command
    let cmd = build_server_command(app_root);

    // THEN: Should run `cmd.exe /c demo.bat` from <root>\demo\bin
    let program = cmd.as_std().get_program().to_string_lossy();
    assert_eq!(program, "cmd.exe", "Batch invocation goes through the shell");

    let args: Vec<_> = cmd
        .as_std()
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, ["/c", SERVER_BATCH_FILE], "Should run the batch file");

    let expected_dir = app_root.join(SERVER_BIN_DIR);
    assert_eq!(
        cmd.as_std().get_current_dir(),
        Some(expected_dir.as_path()),
        "Should run from the server's own directory"
    );
}
