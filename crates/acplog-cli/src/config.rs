//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory searched when no log paths are given.
    pub logs_dir: PathBuf,
    /// File extension of log files inside a directory.
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir().unwrap_or_else(|| PathBuf::from(".")),
            extension: "log".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`, then
    /// `ACPLOG_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("ACPLOG_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for acplog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("acplog"))
}

/// Where ACP keeps its console logs by default.
fn default_logs_dir() -> Option<PathBuf> {
    dirs::document_dir().map(|p| p.join("ACP Astronomy").join("Logs"))
}
