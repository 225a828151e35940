// src/model/mod.rs

use crate::protocol::{ExecutedStep, InteractionLogEntry};
use tracing::debug;

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The planner service failed or returned nothing usable.
    NoPlan,
    /// The user declined the plan.
    Cancelled,
    /// Every step exited with 0.
    Completed,
    /// `step` is the zero-based index of the step that failed.
    StepFailed { step: usize, exit_code: i32 },
}

impl Outcome {
    /// Only runs that reached execution are written to the interaction log.
    pub fn is_logged(&self) -> bool {
        matches!(self, Outcome::Completed | Outcome::StepFailed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Planning,
    AwaitingConfirmation,
    Executing,
    Finished(Outcome),
}

impl RunState {
    fn can_advance_to(&self, next: &RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Planning)
                | (Planning, AwaitingConfirmation)
                | (Planning, Finished(Outcome::NoPlan))
                | (AwaitingConfirmation, Executing)
                | (AwaitingConfirmation, Finished(Outcome::Cancelled))
                | (Executing, Finished(Outcome::Completed))
                | (Executing, Finished(Outcome::StepFailed { .. }))
        )
    }
}

/// State of one engine invocation.
#[derive(Clone, Debug)]
pub struct TaskModel {
    pub goal: String,
    pub state: RunState,
    pub executed: Vec<ExecutedStep>,
}

impl TaskModel {
    pub fn new(goal: &str) -> Self {
        Self {
            goal: goal.to_string(),
            state: RunState::Idle,
            executed: Vec::new(),
        }
    }

    pub fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(&next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "advance");
        self.state = next;
    }

    pub fn record(&mut self, step: ExecutedStep) {
        self.executed.push(step);
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            RunState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn log_entry(&self) -> InteractionLogEntry {
        InteractionLogEntry {
            prompt: self.goal.clone(),
            executed_plan: self.executed.clone(),
        }
    }
}
