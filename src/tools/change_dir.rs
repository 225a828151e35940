// src/tools/change_dir.rs

use crate::config::expand_home;
use crate::protocol::ExecutionResult;
use crate::tools::Tool;
use std::env;
use tracing::debug;

const PREFIX: &str = "cd ";

/// Handles `cd <dir>` in-process so later steps see the new directory.
///
/// A `cd` run in a child shell would only change the child's directory.
pub struct ChangeDirTool;

impl ChangeDirTool {
    /// Extracts the target directory from a `cd` command.
    pub fn target(command: &str) -> Option<String> {
        let arg = command.strip_prefix(PREFIX)?.trim();
        Some(unquote(arg).to_string())
    }
}

fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if arg.len() >= 2 && arg.starts_with(quote) && arg.ends_with(quote) {
            return &arg[1..arg.len() - 1];
        }
    }
    arg
}

impl Tool for ChangeDirTool {
    fn name(&self) -> &str {
        "cd"
    }

    fn description(&self) -> &str {
        "Changes the engine's own working directory."
    }

    fn handles(&self, command: &str) -> bool {
        command.starts_with(PREFIX)
    }

    fn execute(&self, command: &str) -> ExecutionResult {
        let Some(target) = Self::target(command) else {
            return ExecutionResult::failed(format!("not a cd command: {command}"), 1);
        };
        let path = expand_home(&target);
        debug!(path = %path.display(), "execute: changing directory");

        match env::set_current_dir(&path).and_then(|_| env::current_dir()) {
            Ok(cwd) => ExecutionResult::ok(format!("Changed directory to {}", cwd.display())),
            Err(e) => ExecutionResult::failed(e.to_string(), 1),
        }
    }
}
