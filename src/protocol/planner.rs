// src/protocol/planner.rs

use crate::protocol::Plan;
use crate::tools::{Oracle, OracleError};
use crate::validation::{PlanValidationError, strip_code_fences, validate_plan};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("model call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("model reply is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("model reply does not match the plan schema: {}", join(.0))]
    Invalid(Vec<PlanValidationError>),

    #[error("The generated plan is empty.")]
    EmptyPlan,
}

fn join(errors: &[PlanValidationError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

/// Turns a free-text goal into a validated, non-empty plan.
///
/// Holds no state beyond the injected oracle; every call is independent.
pub struct Planner<O: Oracle> {
    oracle: O,
}

impl<O: Oracle> Planner<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// The instruction prompt with `query` substituted verbatim.
    pub fn build_prompt(query: &str) -> String {
        format!(
            r#"
You are an expert Bash/Zsh command line assistant. Your goal is to understand a user's natural language query and break it down into a sequence of simple, logical, executable commands.

Constraints:
1.  Output Format: You MUST respond with a single, valid JSON object.
2.  JSON Structure: The root JSON object must have a single key: "plan".
3.  Plan Structure: The value of "plan" must be a LIST of JSON objects.
4.  Step Structure: Each object in the "plan" list represents one step and must have two keys:
    - command: A string containing a single, simple shell command.
    - explanation: A brief, one-sentence string explaining what this specific command does.
5.  Simplicity: Prefer simple, atomic commands. Avoid complex chains with && unless absolutely necessary for a single logical operation. For example, instead of 'cd dir && ls', create two separate steps.
6.  No Plan: If the query is not a request for a shell command, return an empty list for the "plan".

Example:
User Query: "go into the 'docs' folder and list its contents"
Your JSON Response:
{{
  "plan": [
    {{
      "command": "cd docs",
      "explanation": "Changes the current directory to 'docs'."
    }},
    {{
      "command": "ls -l",
      "explanation": "Lists the contents of the current directory in a detailed format."
    }}
  ]
}}

User Query:
"{query}"

Your JSON Response:
"#
        )
    }

    pub fn request_plan(&self, query: &str) -> Result<Plan, PlanningError> {
        debug!(query_len = query.len(), "request_plan: called");
        let raw = self.oracle.complete(&Self::build_prompt(query))?;
        let plan = parse_plan(&raw);
        if let Err(e) = &plan {
            warn!(error = %e, raw = %raw, "request_plan: rejected model reply");
        }
        plan
    }
}

/// Sanitize-then-validate a raw model reply.
pub fn parse_plan(raw: &str) -> Result<Plan, PlanningError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)?;

    let errors = validate_plan(&value);
    if errors == [PlanValidationError::EmptyPlan] {
        return Err(PlanningError::EmptyPlan);
    }
    if !errors.is_empty() {
        return Err(PlanningError::Invalid(errors));
    }

    let plan: Plan = serde_json::from_value(value)?;
    debug!(steps = plan.len(), "parse_plan: accepted");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlanStep;
    use std::sync::Mutex;

    /// Replays a canned reply and remembers the prompt it was given.
    struct FakeOracle {
        reply: Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeOracle {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Oracle for FakeOracle {
        fn complete(&self, prompt: &str) -> Result<String, OracleError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(OracleError::InvalidResponse)
        }
    }

    #[test]
    fn prompt_embeds_query_verbatim() {
        let prompt = Planner::<FakeOracle>::build_prompt("find *.rs files \"now\"");
        assert!(prompt.contains("User Query:\n\"find *.rs files \"now\"\""));
        assert!(prompt.contains(r#"The root JSON object must have a single key: "plan"."#));
        assert!(prompt.contains("\"command\": \"cd docs\""));
    }

    #[test]
    fn preserves_step_order() {
        let reply = r#"```json
{"plan": [
  {"command": "mkdir build", "explanation": "Creates build."},
  {"command": "cd build", "explanation": "Enters build."},
  {"command": "ls", "explanation": "Lists files."}
]}
```"#;
        let planner = Planner::new(FakeOracle::replying(reply));

        let plan = planner.request_plan("make a build dir and look inside").unwrap();

        let commands: Vec<_> = plan.steps.iter().map(|s| s.command.as_str()).collect();
        assert_eq!(commands, vec!["mkdir build", "cd build", "ls"]);
        assert!(planner.oracle.seen.lock().unwrap()[0].contains("make a build dir and look inside"));
    }

    #[test]
    fn empty_plan_is_a_planning_error() {
        let planner = Planner::new(FakeOracle::replying(r#"{"plan": []}"#));
        let err = planner.request_plan("what is the capital of France").unwrap_err();
        assert!(matches!(err, PlanningError::EmptyPlan));
    }

    #[test]
    fn prose_reply_is_malformed_json() {
        let err = parse_plan("Sure! Here is your plan: ls").unwrap_err();
        assert!(matches!(err, PlanningError::MalformedJson(_)));
    }

    #[test]
    fn schema_mismatch_lists_problems() {
        let err = parse_plan(r#"{"plan": [{"command": "ls"}]}"#).unwrap_err();
        assert!(matches!(err, PlanningError::Invalid(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn oracle_failure_is_surfaced() {
        let planner = Planner::new(FakeOracle::failing("quota exceeded"));
        let err = planner.request_plan("ls").unwrap_err();
        assert!(matches!(err, PlanningError::Oracle(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn single_step_plan() {
        let plan = parse_plan(r#"{"plan": [{"command": "ls -l", "explanation": "Lists directory contents."}]}"#)
            .unwrap();
        assert_eq!(plan.steps, vec![PlanStep::new("ls -l", "Lists directory contents.")]);
    }
}
