//! Core value types shared by events and summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a target within its owning log.
///
/// Targets live in an arena on the [`Log`](crate::Log); events refer to them
/// by handle rather than by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(u32);

impl TargetId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the target in the log's target list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single imaging exposure as announced by the script runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exposure {
    /// Exposure length in seconds.
    pub duration: f64,
    /// Filter name as written in the log (case preserved).
    pub filter: String,
    /// Binning factor.
    pub bin: u32,
}

impl Exposure {
    pub fn new(duration: f64, filter: impl Into<String>, bin: u32) -> Self {
        Self {
            duration,
            filter: filter.into(),
            bin,
        }
    }

    /// Whether two exposures belong to the same (filter, bin, duration) group.
    #[expect(clippy::float_cmp, reason = "durations are parsed from the same log text")]
    #[must_use]
    pub fn same_setup(&self, other: &Self) -> bool {
        self.filter == other.filter && self.bin == other.bin && self.duration == other.duration
    }
}

/// A group of identical exposures and how many times it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureSummary {
    pub exposure: Exposure,
    pub count: usize,
}

impl ExposureSummary {
    /// Total open-shutter time of the group in seconds.
    #[expect(clippy::cast_precision_loss, reason = "exposure counts fit in f64 mantissa")]
    #[must_use]
    pub fn total_time(&self) -> f64 {
        self.count as f64 * self.exposure.duration
    }
}

/// Group exposures by setup, keeping the order in which each setup first appears.
pub fn group_exposures<'a>(exposures: impl IntoIterator<Item = &'a Exposure>) -> Vec<ExposureSummary> {
    let mut groups: Vec<ExposureSummary> = Vec::new();
    for exposure in exposures {
        match groups.iter_mut().find(|g| g.exposure.same_setup(exposure)) {
            Some(group) => group.count += 1,
            None => groups.push(ExposureSummary {
                exposure: exposure.clone(),
                count: 1,
            }),
        }
    }
    groups
}

/// Success and failure tally for an operation such as auto-focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessCounter {
    pub successes: usize,
    pub failures: usize,
}

impl SuccessCounter {
    pub const fn record(&mut self, success: bool) {
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.successes + self.failures
    }

    /// Success percentage rounded to whole percent; 0 when nothing was attempted.
    #[expect(clippy::cast_precision_loss, reason = "attempt counts fit in f64 mantissa")]
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        round0(100.0 * self.successes as f64 / self.total() as f64)
    }
}

impl std::ops::Add for SuccessCounter {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            successes: self.successes + rhs.successes,
            failures: self.failures + rhs.failures,
        }
    }
}

impl std::iter::Sum for SuccessCounter {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, c| acc + c)
    }
}

/// Round to two decimals, used for measurement ratios.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to whole units, used for durations.
#[must_use]
pub fn round0(value: f64) -> f64 {
    value.round()
}

/// Arithmetic mean, or 0 for an empty set.
#[expect(clippy::cast_precision_loss, reason = "sample counts fit in f64 mantissa")]
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
