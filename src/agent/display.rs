// src/agent/display.rs

use crate::protocol::{ExecutionResult, Plan};
use colored::Colorize;
use std::fmt::Write;

pub fn activated(goal: &str) -> String {
    format!("{} {}", "🤖 Agent activated. Goal:".bold().blue(), goal)
}

pub fn plan(plan: &Plan) -> String {
    let mut out = format!("\n{}\n", "📝 Agent's Plan:".bold().yellow());
    for (i, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}", format!("Step {}:", i + 1).bold());
        let _ = writeln!(out, "    {}", step.command.cyan());
        let _ = writeln!(out, "    {}", format!("↳ {}", step.explanation).blue());
    }
    out
}

pub const CONFIRM_PROMPT: &str = "\nExecute this plan? [y/n] ";

pub fn cancelled() -> String {
    "Execution cancelled.".to_string()
}

pub fn step_header(command: &str) -> String {
    format!("\n{}", format!("▶️  Executing Step: {command}").cyan())
}

pub fn executing() -> String {
    "===== Executing =====".yellow().to_string()
}

/// Marker printed after a subprocess step, with its captured output first.
pub fn command_finished(result: &ExecutionResult) -> String {
    let marker = if result.success() {
        "===== Done =====".green().to_string()
    } else {
        format!("===== Command Failed (Exit Code: {}) =====", result.exit_code)
            .red()
            .to_string()
    };
    format!("{}{}{}", result.stdout, result.stderr, marker)
}

pub fn directory_changed(result: &ExecutionResult) -> String {
    if result.success() {
        result.stdout.green().to_string()
    } else {
        format!("Failed to change directory: {}", result.stderr).red().to_string()
    }
}

pub fn aborted() -> String {
    format!("\n{}", "❌ A step failed. Aborting the plan.".bold().red())
}

pub fn finished() -> String {
    format!("\n{}", "✅ Agent finished successfully.".bold().green())
}

pub fn no_plan(cause: &dyn std::fmt::Display) -> String {
    format!(
        "{}\n{}",
        format!("Error contacting brain or parsing plan: {cause}").red(),
        "Agent could not form a plan.".red()
    )
}
