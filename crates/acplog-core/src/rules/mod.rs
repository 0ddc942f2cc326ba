//! Marker rules: recognizers that turn log lines into typed events.
//!
//! Every rule is a plain function of a [`ParseContext`] and returns either the
//! event it recognized or the reason it did not. Rules never mutate anything;
//! the dispatcher in [`crate::log`] decides what to keep.
//!
//! Markers are matched case-insensitively against an ASCII-lowercased copy of
//! each line, which keeps byte offsets aligned with the original. Values such
//! as target and filter names are sliced from the original line so their case
//! is preserved.

mod guider;
mod imaging;
mod sequence;
mod slew;
mod solve;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::clock::{LogClock, span_seconds};
use crate::cursor::{LineCursor, Scan, ScanLimit};
use crate::event::{EventPayload, LogEvent};
use crate::event_type::EventType;

pub use guider::{guider_failure, guider_settle, guider_start_up};
pub use imaging::{auto_focus_count, exposure, filter_change, fwhm, hfd, target_start};
pub use sequence::{script_aborted, script_error, wait};
pub use slew::{
    auto_focus_time, center_slew_pointing_error, object_slew_pointing_error, pointing_error,
    slew_target,
};
pub use solve::{all_sky_solve, all_sky_solve_time, plate_solve, pointing_exp_and_plate_solve};

/// Marker text, lowercase.
pub mod marker {
    pub const LOG_OPENED: &str = "log opened";
    pub const LOG_CLOSED: &str = "log closed";
    pub const STARTING_TARGET: &str = "starting target";
    pub const IMAGING_TO: &str = "imaging to";
    pub const TAKING: &str = "(taking";
    pub const SWITCHING_FROM: &str = "switching from";
    pub const GUIDE_STAR: &str = "(guide star";
    pub const START_SLEW_TO: &str = "start slew to";
    pub const START_SLEW_TO_AUTOFOCUS: &str = "start slew to autofocus";
    pub const SLEW_COMPLETE: &str = "slew complete";
    pub const RE_SLEW_TO_TARGET: &str = "re-slew to target";
    pub const UPDATING_POINTING: &str = "updating pointing";
    pub const TARGET_CENTERED: &str = "target is now centered";
    pub const AIMING_FAILED: &str = "**aiming failed";
    pub const POINTING_ERROR_IS: &str = "pointing error is";
    pub const SOLVED: &str = "solved!";
    pub const PLATE_SOLVE_ERROR: &str = "plate solve error!";
    pub const NO_MATCHING_STARS: &str = "no matching stars found";
    pub const SOLUTION_SUSPECT: &str = "solution is suspect";
    pub const ALL_SKY_ATTEMPT: &str = "attempting all-sky plate solution";
    pub const ALL_SKY_SUCCESS: &str = "all-sky solution successful";
    pub const ALL_SKY_FAILED: &str = "all-sky solution failed";
    pub const ALL_SKY_INCORRECT: &str = "all-sky solution was incorrect";
    pub const AUTOFOCUS_FINISHED: &str = "autofocus finished";
    pub const AUTOFOCUS_FAILED: &str = "**autofocus failed";
    pub const AUTOFOCUS_SUCCESSFUL: &str = "auto-focus successful!";
    pub const HFD: &str = "hfd =";
    pub const IMAGE_FWHM_IS: &str = "image fwhm is";
    pub const WAIT_UNTIL: &str = "wait until";
    pub const WAIT_FINISHED: &str = "wait finished";
    pub const TRYING_TO_AUTOGUIDE: &str = "trying to autoguide";
    pub const AUTOGUIDING_AT: &str = "autoguiding at";
    pub const GUIDER_CHECK_OK: &str = "guider check ok";
    pub const AUTOGUIDING_FAILED: &str = "**autoguiding failed";
    pub const EXCESSIVE_GUIDING_ERRORS: &str = "excessive guiding errors";
    pub const GUIDER_STOPPED: &str = "guider stopped or lost star";
    pub const CONTINUING_UNGUIDED: &str = "continuing unguided";
    pub const SCRIPT_ERROR: &str = "**script error";
    pub const SCRIPT_ABORTED: &str = "script was aborted";

    /// Markers that mean a plate solution could not be trusted.
    pub const PLATE_SOLVE_FAILURES: [&str; 3] = [PLATE_SOLVE_ERROR, NO_MATCHING_STARS, SOLUTION_SUSPECT];
}

/// Why a rule produced no event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleMiss {
    #[error("begin marker not present")]
    NoMatch,
    #[error("span excluded by {marker:?}")]
    Excluded { marker: &'static str },
    #[error("end marker not found within scan bound")]
    BoundExceeded,
    #[error("malformed number: {text:?}")]
    MalformedNumber { text: String },
    #[error("line has no timestamp")]
    MissingTimestamp,
}

pub type RuleResult = Result<LogEvent, RuleMiss>;

/// Signature shared by all marker rules.
pub type Rule = fn(&ParseContext<'_>) -> RuleResult;

/// The view of a log a rule sees: the current line plus scan access to its neighbors.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    raw: LineCursor<'a>,
    lower: LineCursor<'a>,
    clock: LogClock,
}

impl<'a> ParseContext<'a> {
    /// `raw` and `lowered` must hold the same lines, the latter lowercased.
    #[must_use]
    pub fn new(raw: &'a [String], lowered: &'a [String], index: usize, clock: LogClock) -> Self {
        debug_assert_eq!(raw.len(), lowered.len());
        Self {
            raw: LineCursor::new(raw, index),
            lower: LineCursor::new(lowered, index),
            clock,
        }
    }

    /// The same log positioned at another line.
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        Self {
            raw: self.raw.at(index),
            lower: self.lower.at(index),
            clock: self.clock,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.lower.index()
    }

    /// Current line, lowercase.
    #[must_use]
    pub fn line(&self) -> &'a str {
        self.lower.line()
    }

    /// Current line as written.
    #[must_use]
    pub fn raw_line(&self) -> &'a str {
        self.raw.line()
    }

    #[must_use]
    pub fn previous_line(&self) -> &'a str {
        self.lower.previous_line()
    }

    #[must_use]
    pub fn next_line(&self) -> &'a str {
        self.lower.next_line()
    }

    /// Lowercase lines after the current one.
    #[must_use]
    pub fn scan_forward(&self, limit: ScanLimit) -> Scan<'a> {
        self.lower.scan_forward(limit)
    }

    /// Lowercase lines before the current one.
    #[must_use]
    pub fn scan_backward(&self, limit: ScanLimit) -> Scan<'a> {
        self.lower.scan_backward(limit)
    }

    pub const fn clock(&self) -> LogClock {
        self.clock
    }

    /// Timestamp of the current line.
    pub fn stamp(&self) -> Result<NaiveDateTime, RuleMiss> {
        self.stamp_at(self.index())
    }

    pub fn stamp_at(&self, index: usize) -> Result<NaiveDateTime, RuleMiss> {
        self.clock
            .stamp(self.raw.line_at(index))
            .ok_or(RuleMiss::MissingTimestamp)
    }

    /// Event stamped with the current line's time.
    pub fn event(&self, kind: EventType, payload: EventPayload) -> RuleResult {
        Ok(LogEvent::new(kind, self.index(), payload).starting(self.stamp()?))
    }

    /// Duration event spanning from `begin` to `end`.
    pub fn span(&self, kind: EventType, begin: usize, end: usize) -> RuleResult {
        let start = self.stamp_at(begin)?;
        let finish = self.stamp_at(end)?;
        Ok(LogEvent::new(
            kind,
            self.index(),
            EventPayload::Duration(span_seconds(start, finish)),
        )
        .starting(start)
        .ending(finish))
    }
}

/// Fails with [`RuleMiss::NoMatch`] unless `line` contains `marker`.
fn require(line: &str, marker: &str) -> Result<(), RuleMiss> {
    if line.contains(marker) {
        Ok(())
    } else {
        Err(RuleMiss::NoMatch)
    }
}

/// First marker from `markers` contained in `line`.
fn find_marker(line: &str, markers: &[&'static str]) -> Option<&'static str> {
    markers.iter().copied().find(|m| line.contains(m))
}

/// Parses the number between `keyword` and `terminator`, e.g. `"is"` .. `"arcsec"`.
fn number_between(line: &str, keyword: &str, terminator: &str) -> Result<f64, RuleMiss> {
    let start = line.find(keyword).ok_or(RuleMiss::NoMatch)? + keyword.len();
    let rest = &line[start..];
    let Some(end) = rest.find(terminator) else {
        return Err(RuleMiss::MalformedNumber {
            text: rest.trim().to_string(),
        });
    };
    parse_number(&rest[..end])
}

/// Parses the first whitespace-delimited token after `keyword`.
fn number_after(line: &str, keyword: &str) -> Result<f64, RuleMiss> {
    let start = line.find(keyword).ok_or(RuleMiss::NoMatch)? + keyword.len();
    let token = line[start..].split_whitespace().next().unwrap_or("");
    parse_number(token)
}

fn parse_number(text: &str) -> Result<f64, RuleMiss> {
    let text = text.trim();
    text.parse().map_err(|_| RuleMiss::MalformedNumber {
        text: text.to_string(),
    })
}
