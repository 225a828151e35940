// src/validation/mod.rs

use regex::Regex;
use std::sync::LazyLock;

pub mod plan;

pub use plan::{PlanValidationError, validate_plan};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json)?").expect("valid regex"));

/// Removes markdown code fences the model may wrap around its JSON.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"plan\": []}\n```\n";
        assert_eq!(strip_code_fences(raw), "{\"plan\": []}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        let raw = r#"  {"plan": [{"command": "ls", "explanation": "x"}]}  "#;
        assert_eq!(strip_code_fences(raw), raw.trim());
    }
}
