// src/protocol/mod.rs

use serde::{Deserialize, Serialize};

pub mod planner;

/// One atomic shell command proposed by the planner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub command: String,
    pub explanation: String,
}

impl PlanStep {
    pub fn new(command: &str, explanation: &str) -> Self {
        Self {
            command: command.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

/// Ordered steps for one goal. Serializes as the `/get_plan` response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "plan")]
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Request body for `POST /get_plan`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub query: String,
}

/// Error body returned by the planner service on any non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Captured outcome of running one step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failed(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedStep {
    pub command: String,
    pub explanation: String,
    pub result: ExecutionResult,
}

impl ExecutedStep {
    pub fn new(step: &PlanStep, result: ExecutionResult) -> Self {
        Self {
            command: step.command.clone(),
            explanation: step.explanation.clone(),
            result,
        }
    }
}

/// One line of the interaction log: the goal and every step that was attempted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub prompt: String,
    pub executed_plan: Vec<ExecutedStep>,
}
