//! Command-line argument definitions.

use std::path::PathBuf;

use acplog_core::EventType;
use clap::{Parser, Subcommand};

/// Statistics from ACP observatory logs.
///
/// Parses ACP console logs and reports where the night went: slews,
/// focusing, plate solves, guiding and time spent imaging.
#[derive(Debug, Parser)]
#[command(name = "acplog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize logs, one by one and as a collection.
    Summary {
        /// Log files or directories of logs. Defaults to the configured logs directory.
        paths: Vec<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the events recognized in one log.
    Events {
        /// The log file.
        file: PathBuf,

        /// Only show events of this kind (e.g. `slew_target`).
        #[arg(long)]
        kind: Option<EventType>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show per-target exposures and averages for one log.
    Targets {
        /// The log file.
        file: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accepts_many_paths() {
        let cli = Cli::parse_from(["acplog", "summary", "a.log", "logs/", "--json"]);
        match cli.command {
            Commands::Summary { paths, json } => {
                assert_eq!(paths, vec![PathBuf::from("a.log"), PathBuf::from("logs/")]);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_events_kind_is_parsed() {
        let cli = Cli::parse_from(["acplog", "-v", "events", "a.log", "--kind", "slew_target"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Events { kind, .. } => assert_eq!(kind, Some(EventType::SlewTarget)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_kind_is_rejected() {
        assert!(Cli::try_parse_from(["acplog", "events", "a.log", "--kind", "teleport"]).is_err());
    }
}
