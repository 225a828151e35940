//! agentic-shell: natural-language goals to confirmed, sequential shell commands.
//!
//! The `agent-brain` binary asks a language model for a plan; the `agent`
//! binary fetches that plan, asks for confirmation, runs each step in order
//! and appends the run to an interaction log.

pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod memory;
pub mod model;
pub mod protocol;
pub mod service;
pub mod tools;
pub mod validation;
