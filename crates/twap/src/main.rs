//! Main entry point for twap.

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use twap::{App, AppError, Cli};
use twap_common::init_logging;
use twap_config::ConfigLoader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    init_logging(&config.logging).map_err(|e| AppError::Logging(e.to_string()))?;
    debug!(?cli, "Starting twap");

    App::new(config).run(cli.mode()).await?;
    Ok(())
}
