//! Brave Agent: an interactive terminal search agent
//!
//! This is the main entry point for the application.

use anyhow::Result;
use brave_agent::{
    agent::{stdin_reader, Agent},
    config,
    terminal::Console,
};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before reading any variable, including the log filter
    let dotenv = config::load_dotenv();

    // Initialize logging
    let filter =
        EnvFilter::try_from_env("BRAVE_AGENT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let console = Console::stdout();
    match run(console.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = console.fatal(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(console: Console) -> Result<()> {
    info!("Starting brave-agent v{}", brave_agent::VERSION);

    let settings = config::load()?;
    let agent = Agent::from_settings(&settings, console)?;
    let mut input = stdin_reader()?;

    agent.run(input.as_mut()).await?;
    Ok(())
}
