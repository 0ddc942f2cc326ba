//! Targets command: exposures and averages per target.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use acplog_core::TargetSummary;
use anyhow::Result;

use super::summary::format_stats;
use super::util::{format_duration, load_log};

pub fn format_targets(summaries: &[TargetSummary]) -> String {
    let mut output = String::new();

    if summaries.is_empty() {
        writeln!(output, "No targets in this log.").unwrap();
        return output;
    }

    for (i, target) in summaries.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        writeln!(output, "{}", target.name).unwrap();
        writeln!(output, "{}", "─".repeat(target.name.chars().count())).unwrap();
        for group in &target.exposures {
            let exposure = &group.exposure;
            let filter = if exposure.filter.is_empty() {
                "(no filter)"
            } else {
                exposure.filter.as_str()
            };
            writeln!(
                output,
                "  {} × {}s {filter} bin {}",
                group.count, exposure.duration, exposure.bin
            )
            .unwrap();
        }
        writeln!(output, "Imaging time:    {}", format_duration(target.imaging_time)).unwrap();
        format_stats(&mut output, &target.stats);
    }

    output
}

pub fn run<W: Write>(writer: &mut W, file: &Path, json: bool) -> Result<()> {
    let log = load_log(file)?;
    let summaries: Vec<TargetSummary> = log.targets().map(|t| t.summary()).collect();
    tracing::debug!(path = %file.display(), targets = summaries.len(), "summarized targets");

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summaries)?)?;
    } else {
        write!(writer, "{}", format_targets(&summaries))?;
    }
    Ok(())
}
