use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use acplog_cli::commands::{events, summary, targets};
use acplog_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Summary { paths, json } => {
            let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            summary::run(&mut stdout, paths, &config, *json)?;
        }
        Commands::Events { file, kind, json } => {
            events::run(&mut stdout, file, *kind, *json)?;
        }
        Commands::Targets { file, json } => {
            targets::run(&mut stdout, file, *json)?;
        }
    }

    Ok(())
}
