//! Shared helpers for commands: finding and reading log files.

use std::fs;
use std::path::{Path, PathBuf};

use acplog_core::{Log, LogSource};
use anyhow::{Context, Result, bail};

/// Expands `paths` into log files. Directories contribute their files with
/// the given extension, sorted by name; files are taken as given.
pub fn collect_log_files(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_extension(p, extension))
                .collect();
            found.sort();
            tracing::debug!(dir = %path.display(), count = found.len(), "found log files");
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("no such file or directory: {}", path.display());
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Reads a log file. Bytes that are not UTF-8 are replaced rather than rejected.
pub fn read_source(path: &Path) -> Result<LogSource> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(LogSource::new(path, &String::from_utf8_lossy(&bytes)))
}

/// Reads and parses a single log, failing if it is not a recognized log.
pub fn load_log(path: &Path) -> Result<Log> {
    let source = read_source(path)?;
    let mut log = Log::new(source.path, source.lines);
    log.try_parse()
        .with_context(|| format!("{} is not an ACP log", path.display()))?;
    Ok(log)
}

/// Formats seconds as `1h 05m`, or `12m 30s` below an hour.
#[expect(clippy::cast_possible_truncation, reason = "durations are far below i64 seconds")]
pub fn format_duration(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "0s".to_string();
    }
    let total = seconds.round() as i64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours >= 1 {
        format!("{hours}h {minutes:02}m")
    } else if minutes >= 1 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_yields_matching_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("b.log"), "").unwrap();
        fs::write(temp.path().join("a.LOG"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let files = collect_log_files(&[temp.path().to_path_buf()], "log").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.LOG", "b.log"]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = collect_log_files(&[temp.path().join("nope.log")], "log").unwrap_err();
        assert!(err.to_string().contains("no such file or directory"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.log");
        fs::write(&path, b"00:00:01 Starting target: M\xff42\n").unwrap();

        let source = read_source(&path).unwrap();
        assert_eq!(source.lines.len(), 1);
        assert!(source.lines[0].contains('\u{fffd}'));
    }

    #[test]
    fn test_durations_are_human_readable() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(750.0), "12m 30s");
        assert_eq!(format_duration(3900.0), "1h 05m");
    }
}
