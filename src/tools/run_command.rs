use crate::protocol::ExecutionResult;
use crate::tools::Tool;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Exit code reported when the shell itself could not be started.
const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Runs a step through `<shell> -c` in the current working directory.
pub struct RunCommandTool {
    shell: String,
}

impl RunCommandTool {
    pub fn new(shell: &str) -> Self {
        Self {
            shell: shell.to_string(),
        }
    }
}

impl Default for RunCommandTool {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Runs a shell command and captures its stdout, stderr and exit code."
    }

    fn handles(&self, _command: &str) -> bool {
        true
    }

    fn execute(&self, command: &str) -> ExecutionResult {
        debug!(shell = %self.shell, %command, "execute: spawning");
        match Command::new(&self.shell).arg("-c").arg(command).output() {
            Ok(out) => ExecutionResult {
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                exit_code: exit_code(out.status),
            },
            Err(e) => ExecutionResult::failed(
                format!("Command execution failed: {e}"),
                SPAWN_FAILURE_EXIT_CODE,
            ),
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
