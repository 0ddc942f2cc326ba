//! A single observatory log and the dispatcher that parses it.
//!
//! # Dispatch order
//!
//! For every non-empty line the dispatcher first evaluates the fallthrough
//! rules. Their matches never stop processing of the line, because one line
//! can be both an auto-focus milestone and the start of a pointing error span.
//! It then checks for the end of the log, and finally walks the exclusive rule
//! chain until one rule records an event.
//!
//! The pointing error rule is deliberately evaluated twice, once as a
//! fallthrough rule and again in the chain. A second match on the same
//! pointing error is not recorded (see [`ParsePass::has_been_captured`]) and
//! lets the chain continue.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::clock::{LogClock, parse_header_date};
use crate::event::LogEvent;
use crate::event_type::EventType;
use crate::rules::{self, ParseContext, Rule, RuleMiss, marker};
use crate::target::{Target, TargetView};
use crate::types::TargetId;

/// Rules evaluated on every line, whether or not another rule matches it.
const FALLTHROUGH: [(&str, Rule); 4] = [
    ("auto_focus_time", rules::auto_focus_time),
    ("auto_focus_count", rules::auto_focus_count),
    ("fwhm", rules::fwhm),
    ("pointing_error", rules::pointing_error),
];

/// Exclusive rules, in priority order. The first rule that records an event ends the line.
const CHAIN: [(&str, Rule); 16] = [
    ("target_start", rules::target_start),
    ("exposure", rules::exposure),
    ("slew_target", rules::slew_target),
    ("pointing_error", rules::pointing_error),
    ("filter_change", rules::filter_change),
    ("wait", rules::wait),
    ("pointing_exp_and_plate_solve", rules::pointing_exp_and_plate_solve),
    ("plate_solve", rules::plate_solve),
    ("all_sky_solve_time", rules::all_sky_solve_time),
    ("all_sky_solve", rules::all_sky_solve),
    ("guider_start_up", rules::guider_start_up),
    ("guider_settle", rules::guider_settle),
    ("hfd", rules::hfd),
    ("guider_failure", rules::guider_failure),
    ("script_error", rules::script_error),
    ("script_aborted", rules::script_aborted),
];

/// Why a log could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("no \"log opened\" marker found")]
    NotRecognized,
    #[error("cannot read the date of the \"log opened\" line: {0:?}")]
    InvalidOpenDate(String),
}

/// Where a log is in its parse lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    NotStarted,
    Validating,
    Scanning,
    /// The `log closed` marker was reached.
    Closed,
    /// The text is not a recognized log.
    Rejected,
}

/// Counts from a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseReport {
    pub events: usize,
    pub targets: usize,
    /// Whether the `log closed` marker was seen.
    pub closed: bool,
}

/// One log file: its text, and once parsed, its events and targets.
#[derive(Debug, Clone)]
pub struct Log {
    path: PathBuf,
    lines: Vec<String>,
    lowered: Vec<String>,
    events: Vec<LogEvent>,
    targets: Vec<Target>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
    state: ParseState,
}

impl Log {
    pub fn new<S: Into<String>>(path: impl Into<PathBuf>, lines: impl IntoIterator<Item = S>) -> Self {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let lowered = lines.iter().map(|l| l.to_ascii_lowercase()).collect();
        Self {
            path: path.into(),
            lines,
            lowered,
            events: Vec::new(),
            targets: Vec::new(),
            start_date: None,
            end_date: None,
            state: ParseState::NotStarted,
        }
    }

    /// Splits `text` into lines, accepting both `\n` and `\r\n` endings.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::new(path, text.lines())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Events in discovery order, which is not necessarily time order.
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn events_of(&self, kind: EventType) -> impl Iterator<Item = &LogEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn targets(&self) -> impl Iterator<Item = TargetView<'_>> {
        self.targets.iter().map(move |t| TargetView::new(self, t))
    }

    pub fn target(&self, id: TargetId) -> Option<TargetView<'_>> {
        self.targets.get(id.index()).map(|t| TargetView::new(self, t))
    }

    pub fn find_target(&self, name: &str) -> Option<TargetView<'_>> {
        self.targets().find(|t| t.name() == name)
    }

    pub const fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    pub const fn end_date(&self) -> Option<NaiveDateTime> {
        self.end_date
    }

    pub const fn state(&self) -> ParseState {
        self.state
    }

    /// Parses the log, returning whether it was a recognized log.
    pub fn parse(&mut self) -> bool {
        self.try_parse().is_ok()
    }

    /// Parses the log, returning why it was rejected if it was not recognized.
    ///
    /// Any earlier parse results are discarded first, so a log can be parsed again.
    pub fn try_parse(&mut self) -> Result<ParseReport, LogError> {
        self.reset();
        self.state = ParseState::Validating;

        let opened = match self.find_open_date() {
            Ok(opened) => opened,
            Err(e) => {
                self.reset();
                self.state = ParseState::Rejected;
                return Err(e);
            }
        };

        self.state = ParseState::Scanning;
        let clock = LogClock::new(opened);
        let mut pass = ParsePass::default();
        let mut closed_at = None;
        let mut closed = false;

        for index in 0..self.lines.len() {
            if self.lines[index].trim().is_empty() {
                continue;
            }
            let ctx = ParseContext::new(&self.lines, &self.lowered, index, clock);
            if let Some(stamp) = clock.stamp(ctx.raw_line()) {
                pass.last_stamp = Some(stamp);
            }

            for (name, rule) in FALLTHROUGH {
                pass.apply(name, rule, &ctx);
            }

            if ctx.line().contains(marker::LOG_CLOSED) {
                closed_at = parse_header_date(ctx.line());
                closed = true;
                break;
            }

            for (name, rule) in CHAIN {
                if pass.apply(name, rule, &ctx) {
                    break;
                }
            }
        }

        self.start_date = Some(opened);
        self.end_date = closed_at.or(pass.last_stamp);
        self.events = pass.events;
        self.targets = pass.targets;
        self.state = if closed {
            ParseState::Closed
        } else {
            ParseState::Scanning
        };

        tracing::debug!(
            path = %self.path.display(),
            events = self.events.len(),
            targets = self.targets.len(),
            closed,
            "parsed log"
        );

        Ok(ParseReport {
            events: self.events.len(),
            targets: self.targets.len(),
            closed,
        })
    }

    fn find_open_date(&self) -> Result<NaiveDateTime, LogError> {
        let line = self
            .lowered
            .iter()
            .find(|l| l.contains(marker::LOG_OPENED))
            .ok_or(LogError::NotRecognized)?;
        parse_header_date(line).ok_or_else(|| LogError::InvalidOpenDate(line.clone()))
    }

    fn reset(&mut self) {
        self.events.clear();
        self.targets.clear();
        self.start_date = None;
        self.end_date = None;
        self.state = ParseState::NotStarted;
    }
}

/// Mutable state of one parse pass, local to [`Log::try_parse`].
#[derive(Debug, Default)]
struct ParsePass {
    events: Vec<LogEvent>,
    targets: Vec<Target>,
    current: Option<TargetId>,
    last_stamp: Option<NaiveDateTime>,
}

impl ParsePass {
    /// Runs `rule` and records its event. Returns whether a new event was recorded.
    fn apply(&mut self, name: &str, rule: Rule, ctx: &ParseContext<'_>) -> bool {
        match rule(ctx) {
            Ok(event) => self.record(event),
            Err(RuleMiss::NoMatch) => false,
            Err(miss) => {
                tracing::trace!(rule = name, line = ctx.index(), %miss, "rule emitted nothing");
                false
            }
        }
    }

    /// Whether an equivalent event is already recorded.
    ///
    /// Pointing errors are identified by the time of the `pointing error is`
    /// line, so one measurement is never attributed to both a center slew and
    /// an object slew.
    fn has_been_captured(&self, event: &LogEvent) -> bool {
        if event.kind.is_pointing_error() {
            return self
                .events
                .iter()
                .any(|e| e.kind.is_pointing_error() && e.end.is_some() && e.end == event.end);
        }
        self.events
            .iter()
            .any(|e| e.kind == event.kind && e.line == event.line && e.start == event.start)
    }

    fn record(&mut self, mut event: LogEvent) -> bool {
        if self.has_been_captured(&event) {
            return false;
        }
        if event.kind == EventType::TargetStart {
            if let Some(name) = event.note() {
                self.current = Some(self.open_target(name.to_string()));
            }
        }
        event.target = self.current;
        self.events.push(event);
        true
    }

    /// Handle of the target named `name`, creating it on first use.
    fn open_target(&mut self, name: String) -> TargetId {
        if let Some(existing) = self.targets.iter().find(|t| t.name == name) {
            return existing.id;
        }
        #[expect(clippy::cast_possible_truncation, reason = "a log never opens u32::MAX targets")]
        let id = TargetId::new(self.targets.len() as u32);
        self.targets.push(Target { id, name });
        id
    }
}
