use anyhow::Result;
use clap::Parser;

use starkpulse::application::commands::{Cli, CommandExecutor};
use starkpulse::shared::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    CommandExecutor::execute(cli.command, config).await?;
    Ok(())
}
