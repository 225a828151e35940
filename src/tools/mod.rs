// src/tools/mod.rs

use crate::protocol::ExecutionResult;

/// A runner for plan steps. The engine picks the first registered tool that handles a command.
pub trait Tool {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn handles(&self, command: &str) -> bool;
    fn execute(&self, command: &str) -> ExecutionResult;
}

pub mod change_dir;
pub mod llm;
pub mod run_command;

pub use change_dir::ChangeDirTool;
pub use llm::{LLMTool, Oracle, OracleError};
pub use run_command::RunCommandTool;
