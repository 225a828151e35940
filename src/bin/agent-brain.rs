//! agent-brain: the planner service.

use clap::Parser;
use eyre::{Context as _, Result};
use tiny_http::Server;
use tracing::info;

use agentic_shell::cli::BrainCli;
use agentic_shell::config::Config;
use agentic_shell::protocol::planner::Planner;
use agentic_shell::service::PlannerService;
use agentic_shell::tools::LLMTool;

fn setup_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = BrainCli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.brain.bind = bind;
    }
    config.validate().context("FATAL: planner service is not configured")?;

    let oracle = LLMTool::from_config(&config.llm).context("Failed to initialize the language model client")?;
    let service = PlannerService::new(Planner::new(oracle));

    let server = Server::http(&config.brain.bind)
        .map_err(|e| eyre::eyre!("Failed to bind {}: {}", config.brain.bind, e))?;
    info!(
        bind = %config.brain.bind,
        provider = %config.llm.provider,
        model = %config.llm.model,
        "agent-brain listening"
    );

    service.serve(&server);
    Ok(())
}
