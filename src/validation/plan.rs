// src/validation/plan.rs

use serde_json::{Value, json};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    NotAnObject,
    MissingPlan,
    PlanNotArray,
    EmptyPlan,
    StepNotObject(usize),
    MissingField { step: usize, field: &'static str },
    WrongType { step: usize, field: &'static str },
    BlankField { step: usize, field: &'static str },
}

impl PlanValidationError {
    /// Short message plus an example of the shape that was expected.
    pub fn hint(&self) -> (String, Option<Value>) {
        match self {
            PlanValidationError::NotAnObject => (
                "Response must be a single JSON object.".to_string(),
                Some(json!({ "plan": [] })),
            ),
            PlanValidationError::MissingPlan => (
                "Response object has no 'plan' key.".to_string(),
                Some(json!({ "plan": [] })),
            ),
            PlanValidationError::PlanNotArray => (
                "'plan' must be a list of steps.".to_string(),
                Some(json!({ "plan": [{ "command": "...", "explanation": "..." }] })),
            ),
            PlanValidationError::EmptyPlan => ("The generated plan is empty.".to_string(), None),
            PlanValidationError::StepNotObject(_) => (
                "Each step must be an object.".to_string(),
                Some(json!({ "command": "...", "explanation": "..." })),
            ),
            PlanValidationError::MissingField { field, .. } => (
                "Missing required field.".to_string(),
                Some(json!({ field.to_string(): "<required>" })),
            ),
            PlanValidationError::WrongType { field, .. } => (
                "Field must be a string.".to_string(),
                Some(json!({ field.to_string(): "<string>" })),
            ),
            PlanValidationError::BlankField { field, .. } => (
                "Field must not be blank.".to_string(),
                Some(json!({ field.to_string(): "<non-empty>" })),
            ),
        }
    }

    fn step(&self) -> Option<usize> {
        match self {
            PlanValidationError::StepNotObject(step)
            | PlanValidationError::MissingField { step, .. }
            | PlanValidationError::WrongType { step, .. }
            | PlanValidationError::BlankField { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (msg, hint) = self.hint();
        if let Some(step) = self.step() {
            write!(f, "step {}: ", step + 1)?;
        }
        write!(f, "{msg}")?;
        if let Some(hint) = hint {
            write!(f, " (expected {hint})")?;
        }
        Ok(())
    }
}

/// Checks an already-parsed model reply against the plan schema.
///
/// Returns every problem found; an empty vec means the value can be
/// deserialized into a non-empty [`crate::protocol::Plan`].
pub fn validate_plan(value: &Value) -> Vec<PlanValidationError> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        errors.push(PlanValidationError::NotAnObject);
        return errors;
    };
    let Some(plan) = root.get("plan") else {
        errors.push(PlanValidationError::MissingPlan);
        return errors;
    };
    let Some(steps) = plan.as_array() else {
        errors.push(PlanValidationError::PlanNotArray);
        return errors;
    };
    if steps.is_empty() {
        errors.push(PlanValidationError::EmptyPlan);
        return errors;
    }

    for (index, step) in steps.iter().enumerate() {
        let Some(step) = step.as_object() else {
            errors.push(PlanValidationError::StepNotObject(index));
            continue;
        };

        for field in ["command", "explanation"] {
            match step.get(field) {
                None => errors.push(PlanValidationError::MissingField { step: index, field }),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    errors.push(PlanValidationError::BlankField { step: index, field })
                }
                Some(Value::String(_)) => {}
                Some(_) => errors.push(PlanValidationError::WrongType { step: index, field }),
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_plan() {
        let value = json!({
            "plan": [
                { "command": "cd docs", "explanation": "Changes the current directory to 'docs'." },
                { "command": "ls -l", "explanation": "Lists the contents." }
            ]
        });
        assert!(validate_plan(&value).is_empty());
    }

    #[test]
    fn empty_plan_is_an_error() {
        assert_eq!(validate_plan(&json!({ "plan": [] })), vec![PlanValidationError::EmptyPlan]);
    }

    #[test]
    fn rejects_non_object_root() {
        assert_eq!(validate_plan(&json!([1, 2])), vec![PlanValidationError::NotAnObject]);
        assert_eq!(validate_plan(&json!({ "steps": [] })), vec![PlanValidationError::MissingPlan]);
        assert_eq!(validate_plan(&json!({ "plan": "ls" })), vec![PlanValidationError::PlanNotArray]);
    }

    #[test]
    fn reports_each_bad_step() {
        let value = json!({
            "plan": [
                { "command": "ls" },
                "pwd",
                { "command": 3, "explanation": "  " }
            ]
        });
        let errors = validate_plan(&value);

        assert_eq!(
            errors,
            vec![
                PlanValidationError::MissingField { step: 0, field: "explanation" },
                PlanValidationError::StepNotObject(1),
                PlanValidationError::WrongType { step: 2, field: "command" },
                PlanValidationError::BlankField { step: 2, field: "explanation" },
            ]
        );
    }

    #[test]
    fn display_names_the_step() {
        let err = PlanValidationError::MissingField { step: 1, field: "command" };
        let text = err.to_string();

        assert!(text.starts_with("step 2: Missing required field."));
        assert!(text.contains("command"));
    }
}
