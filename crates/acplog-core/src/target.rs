//! Targets and the per-target view of a log's events.

use serde::{Deserialize, Serialize};

use crate::event::LogEvent;
use crate::event_type::EventType;
use crate::log::Log;
use crate::stats::{EventStats, count_of, mean_of};
use crate::types::{ExposureSummary, TargetId, group_exposures, mean, round0, round2};

/// A named object imaged during a log, opened by `Starting target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub name: String,
}

/// A target together with the log that owns its events.
#[derive(Debug, Clone, Copy)]
pub struct TargetView<'a> {
    log: &'a Log,
    target: &'a Target,
}

impl<'a> TargetView<'a> {
    pub(crate) const fn new(log: &'a Log, target: &'a Target) -> Self {
        Self { log, target }
    }

    pub const fn id(&self) -> TargetId {
        self.target.id
    }

    pub fn name(&self) -> &'a str {
        &self.target.name
    }

    /// Events recognized while this target was open.
    pub fn events(&self) -> impl Iterator<Item = &'a LogEvent> + Clone + use<'a> {
        let id = self.target.id;
        self.log.events().iter().filter(move |e| e.target == Some(id))
    }

    pub fn events_of(&self, kind: EventType) -> impl Iterator<Item = &'a LogEvent> + use<'a> {
        self.events().filter(move |e| e.kind == kind)
    }

    /// Exposures grouped by duration, filter and binning, in order of first appearance.
    pub fn exposure_summaries(&self) -> Vec<ExposureSummary> {
        group_exposures(self.events().filter_map(LogEvent::exposure))
    }

    pub fn exposure_count(&self) -> usize {
        count_of(self.events(), EventType::Exposure)
    }

    /// Seconds of exposure: the sum of count × duration over exposure groups.
    pub fn imaging_time(&self) -> f64 {
        self.exposure_summaries()
            .iter()
            .map(ExposureSummary::total_time)
            .sum()
    }

    pub fn average_fwhm(&self) -> f64 {
        round2(mean_of(self.events(), EventType::Fwhm))
    }

    pub fn average_hfd(&self) -> f64 {
        round2(mean_of(self.events(), EventType::Hfd))
    }

    /// Mean pointing error over both center and object slews.
    pub fn average_pointing_error(&self) -> f64 {
        round2(mean(
            self.events()
                .filter(|e| e.kind.is_pointing_error())
                .filter_map(LogEvent::value),
        ))
    }

    pub fn average_duration(&self, kind: EventType) -> f64 {
        round0(mean_of(self.events(), kind))
    }

    pub fn stats(&self) -> EventStats {
        EventStats::from_events(self.events())
    }

    pub fn summary(&self) -> TargetSummary {
        TargetSummary {
            name: self.name().to_string(),
            exposures: self.exposure_summaries(),
            imaging_time: self.imaging_time(),
            average_pointing_error: self.average_pointing_error(),
            stats: self.stats(),
        }
    }
}

/// Serializable snapshot of a target's figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub name: String,
    pub exposures: Vec<ExposureSummary>,
    pub imaging_time: f64,
    pub average_pointing_error: f64,
    #[serde(flatten)]
    pub stats: EventStats,
}
