//! psgallery - PowerShell Gallery search
//!
//! Probes the local PowerShell host for PSResourceGet, runs one gallery query
//! through it (or through PowerShellGet when it is missing) and prints the
//! hits as a table or JSON.

mod cli;
mod config;
mod logging;
mod output;

use anyhow::Context;
use clap::Parser;
use psgallery_client::{Dispatcher, PwshHost};
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load().context("Failed to load configuration")?;
    if let Some(pwsh) = &cli.pwsh {
        config.pwsh = pwsh.clone();
    }
    if let Some(repository) = &cli.repository {
        config.repository = repository.clone();
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.log_json {
        config.logging.json = true;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    // Reject bad parameters before the host is started
    let query = cli.to_query(&config.repository);
    query.validate().context("Invalid search parameters")?;

    let host = Arc::new(PwshHost::new(config.pwsh.clone()));
    let dispatcher = Dispatcher::connect(host)
        .await
        .context("Failed to probe PowerShell host")?;
    for warning in dispatcher.warnings() {
        eprintln!("WARNING: {warning}");
    }

    tracing::info!(
        backend = %dispatcher.backend_kind(),
        repository = %query.repository,
        "Searching"
    );

    let outcome = dispatcher.search(&query).await?;
    output::print_outcome(&outcome, cli.format)?;

    Ok(())
}
