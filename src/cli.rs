//! CLI definitions for both binaries

use clap::Parser;
use std::path::PathBuf;

/// Turn a plain-English goal into shell commands, confirm, and run them
#[derive(Parser, Debug)]
#[command(
    name = "agent",
    about = "Turn a plain-English goal into shell commands and run them",
    version,
    after_help = "Logs are written to: ~/.local/share/agentic-shell/logs/agent.log"
)]
pub struct AgentCli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Planner endpoint, overriding the config file
    #[arg(long, value_name = "URL")]
    pub brain_url: Option<String>,

    /// The goal, as free text
    #[arg(value_name = "GOAL", trailing_var_arg = true, allow_hyphen_values = true)]
    pub goal: Vec<String>,
}

impl AgentCli {
    /// Goal words joined with single spaces; `None` when no words were given.
    pub fn goal_text(&self) -> Option<String> {
        if self.goal.is_empty() {
            None
        } else {
            Some(self.goal.join(" "))
        }
    }
}

/// Planner service: answers `POST /get_plan` with a JSON plan
#[derive(Parser, Debug)]
#[command(name = "agent-brain", about = "Planner service for the agent CLI", version)]
pub struct BrainCli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Listen address, overriding the config file
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_words_are_joined() {
        let cli = AgentCli::parse_from(["agent", "list", "files", "in", "the", "current", "directory"]);
        assert_eq!(cli.goal_text().as_deref(), Some("list files in the current directory"));
    }

    #[test]
    fn no_goal_words() {
        let cli = AgentCli::parse_from(["agent"]);
        assert_eq!(cli.goal_text(), None);
    }

    #[test]
    fn flags_before_goal_and_hyphens_inside_it() {
        let cli = AgentCli::parse_from(["agent", "-v", "--brain-url", "http://x/get_plan", "show", "ls", "-la", "output"]);
        assert!(cli.verbose);
        assert_eq!(cli.brain_url.as_deref(), Some("http://x/get_plan"));
        assert_eq!(cli.goal_text().as_deref(), Some("show ls -la output"));
    }

    #[test]
    fn brain_bind_override() {
        let cli = BrainCli::parse_from(["agent-brain", "--bind", "0.0.0.0:9000"]);
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:9000"));
    }
}
