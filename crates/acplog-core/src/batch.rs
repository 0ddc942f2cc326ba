//! Parsing many logs at once.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::log::Log;

/// Text of one log file, already read by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl LogSource {
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

/// Parses every source in parallel and returns the recognized logs, oldest first.
///
/// Each log is parsed on its own; nothing is shared between them. Sources
/// that are not logs are skipped with a warning.
pub fn parse_logs(sources: Vec<LogSource>) -> Vec<Log> {
    let mut logs: Vec<Log> = sources
        .into_par_iter()
        .filter_map(|source| {
            let mut log = Log::new(source.path, source.lines);
            match log.try_parse() {
                Ok(_) => Some(log),
                Err(e) => {
                    tracing::warn!(path = ?log.path(), error = %e, "skipping unrecognized log");
                    None
                }
            }
        })
        .collect();

    logs.sort_by_key(Log::start_date);
    logs
}
