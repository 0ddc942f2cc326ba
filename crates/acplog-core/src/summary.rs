//! Run-time accounting for a log and for a collection of logs.
//!
//! A log's run time splits into imaging, waiting and everything else. A log
//! whose split does not add up is reported but left out of collection figures.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::span_seconds;
use crate::event_type::EventType;
use crate::log::Log;
use crate::stats::{EventStats, total_of};
use crate::target::TargetSummary;
use crate::types::{mean, round0};

/// `round(100 × imaging / (run − wait))`, or 0 when no time was left after waiting.
fn imaging_percentage(run: f64, imaging: f64, wait: f64) -> f64 {
    let available = run - wait;
    if available <= 0.0 {
        return 0.0;
    }
    round0(100.0 * imaging / available)
}

fn totals_are_consistent(run: f64, imaging: f64, wait: f64) -> bool {
    let other = run - (wait + imaging);
    run > 0.0
        && imaging >= 0.0
        && wait >= 0.0
        && other >= 0.0
        && imaging <= run
        && imaging_percentage(run, imaging, wait) <= 100.0
}

impl Log {
    /// Seconds from the log's start to its end; 0 unless both are known.
    pub fn total_log_run_time(&self) -> f64 {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) if end >= start => span_seconds(start, end),
            _ => 0.0,
        }
    }

    /// Seconds of exposure over all targets.
    pub fn total_imaging_time(&self) -> f64 {
        self.targets().map(|t| t.imaging_time()).sum()
    }

    pub fn total_wait_time(&self) -> f64 {
        total_of(self.events(), EventType::Wait)
    }

    /// Run time that was neither imaging nor waiting.
    pub fn other_time(&self) -> f64 {
        self.total_log_run_time() - (self.total_wait_time() + self.total_imaging_time())
    }

    /// Imaging as a whole percentage of the time not spent waiting.
    pub fn imaging_time_percentage(&self) -> f64 {
        imaging_percentage(
            self.total_log_run_time(),
            self.total_imaging_time(),
            self.total_wait_time(),
        )
    }

    /// Whether run, imaging and wait times are plausible together.
    pub fn log_totals_are_consistent(&self) -> bool {
        totals_are_consistent(
            self.total_log_run_time(),
            self.total_imaging_time(),
            self.total_wait_time(),
        )
    }

    pub fn stats(&self) -> EventStats {
        EventStats::from_events(self.events())
    }

    pub fn summary(&self) -> LogSummary {
        LogSummary {
            path: self.path().to_path_buf(),
            start_date: self.start_date(),
            end_date: self.end_date(),
            total_log_run_time: self.total_log_run_time(),
            total_imaging_time: self.total_imaging_time(),
            total_wait_time: self.total_wait_time(),
            other_time: self.other_time(),
            imaging_time_percentage: self.imaging_time_percentage(),
            consistent: self.log_totals_are_consistent(),
            targets: self.targets().map(|t| t.summary()).collect(),
            stats: self.stats(),
        }
    }
}

/// Serializable snapshot of one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub path: PathBuf,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub total_log_run_time: f64,
    pub total_imaging_time: f64,
    pub total_wait_time: f64,
    pub other_time: f64,
    pub imaging_time_percentage: f64,
    pub consistent: bool,
    pub targets: Vec<TargetSummary>,
    #[serde(flatten)]
    pub stats: EventStats,
}

/// Figures across several logs.
///
/// Only logs whose totals are consistent take part; the rest are listed as
/// excluded.
#[derive(Debug, Clone, Copy)]
pub struct LogCollectionSummary<'a> {
    logs: &'a [Log],
}

impl<'a> LogCollectionSummary<'a> {
    pub const fn new(logs: &'a [Log]) -> Self {
        Self { logs }
    }

    /// Logs that take part in the figures.
    pub fn logs(&self) -> impl Iterator<Item = &'a Log> + Clone + use<'a> {
        self.logs.iter().filter(|log| log.log_totals_are_consistent())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &'a Log> + use<'a> {
        self.logs.iter().filter(|log| !log.log_totals_are_consistent())
    }

    pub fn log_count(&self) -> usize {
        self.logs().count()
    }

    pub fn total_log_run_time(&self) -> f64 {
        self.logs().map(Log::total_log_run_time).sum()
    }

    pub fn total_imaging_time(&self) -> f64 {
        self.logs().map(Log::total_imaging_time).sum()
    }

    pub fn total_wait_time(&self) -> f64 {
        self.logs().map(Log::total_wait_time).sum()
    }

    pub fn other_time(&self) -> f64 {
        self.total_log_run_time() - (self.total_wait_time() + self.total_imaging_time())
    }

    pub fn imaging_time_percentage(&self) -> f64 {
        imaging_percentage(
            self.total_log_run_time(),
            self.total_imaging_time(),
            self.total_wait_time(),
        )
    }

    /// Mean imaging percentage of the logs taken one at a time.
    pub fn average_imaging_time_percentage(&self) -> f64 {
        round0(mean(self.logs().map(Log::imaging_time_percentage)))
    }

    /// Distinct target names, compared case-sensitively.
    pub fn unique_target_names(&self) -> BTreeSet<&'a str> {
        self.logs()
            .flat_map(|log| log.targets().map(|t| t.name()))
            .collect()
    }

    pub fn unique_target_count(&self) -> usize {
        self.unique_target_names().len()
    }

    pub fn stats(&self) -> EventStats {
        EventStats::from_events(self.logs().flat_map(Log::events))
    }

    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            log_count: self.log_count(),
            total_log_run_time: self.total_log_run_time(),
            total_imaging_time: self.total_imaging_time(),
            total_wait_time: self.total_wait_time(),
            other_time: self.other_time(),
            imaging_time_percentage: self.imaging_time_percentage(),
            average_imaging_time_percentage: self.average_imaging_time_percentage(),
            unique_targets: self
                .unique_target_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            excluded: self.excluded().map(|log| log.path().to_path_buf()).collect(),
            stats: self.stats(),
        }
    }
}

/// Serializable snapshot of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub log_count: usize,
    pub total_log_run_time: f64,
    pub total_imaging_time: f64,
    pub total_wait_time: f64,
    pub other_time: f64,
    pub imaging_time_percentage: f64,
    pub average_imaging_time_percentage: f64,
    pub unique_targets: Vec<String>,
    /// Logs left out because their totals were inconsistent.
    pub excluded: Vec<PathBuf>,
    #[serde(flatten)]
    pub stats: EventStats,
}
