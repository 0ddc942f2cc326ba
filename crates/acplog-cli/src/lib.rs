//! ACP log analyser CLI library.
//!
//! Reads log files from disk and hands their text to `acplog-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
