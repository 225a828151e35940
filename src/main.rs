//! agent: the execution engine CLI.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context as _, Result};
use tracing::info;

use agentic_shell::agent::{Agent, BrainClient};
use agentic_shell::cli::AgentCli;
use agentic_shell::config::Config;
use agentic_shell::context::Context;
use agentic_shell::memory::JsonlLog;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agentic-shell")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // stdout belongs to the user; diagnostics go to a file
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("agent.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = AgentCli::parse();

    let Some(goal) = cli.goal_text() else {
        println!("Usage: agent <your prompt>");
        return Ok(());
    };

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(url) = cli.brain_url {
        config.engine.brain_url = url;
    }
    info!(brain_url = %config.engine.brain_url, "agent loaded config");

    let log_path = config.engine.log_path();
    let log = JsonlLog::new(&log_path).context(format!("Failed to open interaction log {}", log_path.display()))?;
    let planner = BrainClient::from_config(&config.engine).context("Failed to build planner client")?;

    let mut agent = Agent::new(planner, log, Context::new(&config.engine.shell));
    let stdin = io::stdin();
    if let Err(e) = agent.run(&goal, &mut stdin.lock()) {
        eprintln!("{}", format!("Failed to write interaction log: {e}").red());
    }
    Ok(())
}
