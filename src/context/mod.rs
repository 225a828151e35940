// src/context/mod.rs

use crate::protocol::ExecutionResult;
use crate::tools::{ChangeDirTool, RunCommandTool, Tool};
use tracing::debug;

/// Runtime context for the engine: the ordered set of step runners.
pub struct Context {
    pub tools: Vec<Box<dyn Tool + Send + Sync>>,
}

impl Context {
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Directory changes first, everything else through `shell`.
    pub fn new(shell: &str) -> Self {
        Self::empty()
            .register_tool(ChangeDirTool)
            .register_tool(RunCommandTool::new(shell))
    }

    pub fn register_tool<T: Tool + Send + Sync + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    pub fn tool_for(&self, command: &str) -> Option<&(dyn Tool + Send + Sync)> {
        self.tools
            .iter()
            .find(|tool| tool.handles(command))
            .map(|boxed| boxed.as_ref())
    }

    pub fn execute(&self, command: &str) -> ExecutionResult {
        match self.tool_for(command) {
            Some(tool) => {
                debug!(tool = tool.name(), %command, "execute: dispatching");
                tool.execute(command)
            }
            None => ExecutionResult::failed(format!("No runner registered for: {command}"), 1),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new("sh")
    }
}
