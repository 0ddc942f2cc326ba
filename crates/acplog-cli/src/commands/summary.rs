//! Summary command: per-log figures and collection totals.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use acplog_core::{CollectionSummary, EventStats, LogCollectionSummary, LogSummary, parse_logs};
use anyhow::Result;
use serde::Serialize;

use super::util::{collect_log_files, format_duration, read_source};
use crate::Config;

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub logs: Vec<LogSummary>,
    pub collection: CollectionSummary,
}

/// Reads, parses and summarizes the logs under `paths`, or the configured logs directory.
pub fn build_report(paths: &[PathBuf], config: &Config) -> Result<SummaryReport> {
    let paths = if paths.is_empty() {
        vec![config.logs_dir.clone()]
    } else {
        paths.to_vec()
    };
    let files = collect_log_files(&paths, &config.extension)?;
    let sources = files
        .iter()
        .map(|path| read_source(path))
        .collect::<Result<Vec<_>>>()?;

    let logs = parse_logs(sources);
    tracing::debug!(files = files.len(), logs = logs.len(), "parsed logs");

    let collection = LogCollectionSummary::new(&logs);
    Ok(SummaryReport {
        logs: logs.iter().map(acplog_core::Log::summary).collect(),
        collection: collection.summary(),
    })
}

pub fn format_report(report: &SummaryReport) -> String {
    let mut output = String::new();

    writeln!(output, "LOGS").unwrap();
    writeln!(output, "────").unwrap();
    if report.logs.is_empty() {
        writeln!(output, "No ACP logs found.").unwrap();
    }
    for log in &report.logs {
        let marker = if log.consistent { "" } else { "  (excluded)" };
        writeln!(
            output,
            "{}  run {}  imaging {}  wait {}  {}% imaging{marker}",
            log.path.display(),
            format_duration(log.total_log_run_time),
            format_duration(log.total_imaging_time),
            format_duration(log.total_wait_time),
            log.imaging_time_percentage,
        )
        .unwrap();
    }

    let c = &report.collection;
    writeln!(output).unwrap();
    writeln!(output, "COLLECTION").unwrap();
    writeln!(output, "──────────").unwrap();
    writeln!(output, "Logs:            {}", c.log_count).unwrap();
    writeln!(output, "Unique targets:  {}", c.unique_targets.len()).unwrap();
    writeln!(output, "Run time:        {}", format_duration(c.total_log_run_time)).unwrap();
    writeln!(output, "Imaging time:    {}", format_duration(c.total_imaging_time)).unwrap();
    writeln!(output, "Wait time:       {}", format_duration(c.total_wait_time)).unwrap();
    writeln!(output, "Other time:      {}", format_duration(c.other_time)).unwrap();
    writeln!(output, "Imaging:         {}%", c.imaging_time_percentage).unwrap();
    format_stats(&mut output, &c.stats);

    if !c.excluded.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "Excluded (inconsistent totals):").unwrap();
        for path in &c.excluded {
            writeln!(output, "  {}", path.display()).unwrap();
        }
    }

    output
}

/// Appends the averages and counters shared by every summary level.
pub fn format_stats(output: &mut String, stats: &EventStats) {
    writeln!(output, "Avg FWHM:        {}\"", stats.average_fwhm).unwrap();
    writeln!(output, "Avg HFD:         {}", stats.average_hfd).unwrap();
    writeln!(
        output,
        "Avg pointing:    {}' object, {}' center",
        stats.average_object_slew_pointing_error, stats.average_center_slew_pointing_error
    )
    .unwrap();
    writeln!(output, "Avg slew:        {}", format_duration(stats.average_slew_time)).unwrap();
    writeln!(output, "Avg auto-focus:  {}", format_duration(stats.average_auto_focus_time)).unwrap();
    writeln!(
        output,
        "Auto-focus:      {} ok, {} failed",
        stats.auto_focus.successes, stats.auto_focus.failures
    )
    .unwrap();
    writeln!(
        output,
        "Plate solves:    {} ok, {} failed",
        stats.plate_solve.successes, stats.plate_solve.failures
    )
    .unwrap();
    writeln!(
        output,
        "All-sky solves:  {} ok, {} failed",
        stats.all_sky_solve.successes, stats.all_sky_solve.failures
    )
    .unwrap();
    writeln!(
        output,
        "Guiding fails:   {} ({} continued unguided)",
        stats.guiding_failures, stats.continued_unguided
    )
    .unwrap();
}

pub fn run<W: Write>(writer: &mut W, paths: &[PathBuf], config: &Config, json: bool) -> Result<()> {
    let report = build_report(paths, config)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report))?;
    }
    Ok(())
}
