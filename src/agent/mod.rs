// src/agent/mod.rs

use crate::context::Context;
use crate::memory::{InteractionLog, StorageError};
use crate::model::{Outcome, RunState, TaskModel};
use crate::protocol::{ExecutedStep, Plan};
use crate::tools::{ChangeDirTool, Tool};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

pub mod brain_client;
pub mod display;

pub use brain_client::{BrainClient, TransportError};

/// Where the engine gets its plan from.
pub trait PlanSource {
    fn request_plan(&self, query: &str) -> Result<Plan, TransportError>;
}

/// Drives one goal from plan request to logged execution.
pub struct Agent<P: PlanSource, L: InteractionLog> {
    pub planner: P,
    pub log: L,
    pub context: Context,
}

impl<P: PlanSource, L: InteractionLog> Agent<P, L> {
    pub fn new(planner: P, log: L, context: Context) -> Self {
        Self { planner, log, context }
    }

    /// Runs `goal` to completion, reading the confirmation from `input`.
    ///
    /// Returns the final model; its outcome says which terminal state was
    /// reached. Only a failure to append the log entry is an error.
    pub fn run<R: BufRead>(&mut self, goal: &str, input: &mut R) -> Result<TaskModel, StorageError> {
        let mut model = TaskModel::new(goal);
        println!("{}", display::activated(goal));

        model.advance(RunState::Planning);
        let plan = match self.planner.request_plan(goal) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "run: no plan");
                println!("{}", display::no_plan(&e));
                model.advance(RunState::Finished(Outcome::NoPlan));
                return Ok(model);
            }
        };

        model.advance(RunState::AwaitingConfirmation);
        println!("{}", display::plan(&plan));
        if !confirm(input) {
            println!("{}", display::cancelled());
            model.advance(RunState::Finished(Outcome::Cancelled));
            return Ok(model);
        }

        model.advance(RunState::Executing);
        let outcome = self.execute(&plan, &mut model);
        model.advance(RunState::Finished(outcome));

        if model.outcome().is_some_and(Outcome::is_logged) {
            self.log.append(&model.log_entry())?;
            info!(outcome = ?model.outcome(), steps = model.executed.len(), "run: logged");
        }
        Ok(model)
    }

    /// True when the registered tool for `command` is the in-process `cd`.
    fn changes_directory(&self, command: &str) -> bool {
        self.context
            .tool_for(command)
            .is_some_and(|tool| tool.name() == ChangeDirTool.name())
    }

    /// Runs steps in order, stopping at the first non-zero exit.
    fn execute(&self, plan: &Plan, model: &mut TaskModel) -> Outcome {
        for (index, step) in plan.steps.iter().enumerate() {
            println!("{}", display::step_header(&step.command));

            let is_cd = self.changes_directory(&step.command);
            if !is_cd {
                println!("{}", display::executing());
            }
            let result = self.context.execute(&step.command);
            if is_cd {
                println!("{}", display::directory_changed(&result));
            } else {
                println!("{}", display::command_finished(&result));
            }

            let exit_code = result.exit_code;
            model.record(ExecutedStep::new(step, result));

            if exit_code != 0 {
                println!("{}", display::aborted());
                return Outcome::StepFailed { step: index, exit_code };
            }
        }
        println!("{}", display::finished());
        Outcome::Completed
    }
}

/// Empty input or "y" (any case) proceeds; anything else, EOF included, declines.
pub fn confirm<R: BufRead>(input: &mut R) -> bool {
    print!("{}", display::CONFIRM_PROMPT);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => false,
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "" | "y"),
        Err(e) => {
            warn!(error = %e, "confirm: failed to read answer");
            false
        }
    }
}
