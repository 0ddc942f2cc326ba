//! Typed events recognized in a log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event_type::EventType;
use crate::types::{Exposure, TargetId};

/// The value carried by an event. Its variant is fixed by the event's [`EventType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventPayload {
    /// Elapsed seconds between the begin and end markers of a span.
    Duration(f64),
    /// A measured value: FWHM and pointing error in arc units, HFD in pixels.
    Measurement(f64),
    Exposure(Exposure),
    /// Free text, e.g. a target name.
    Note(String),
    /// Whether imaging continued unguided after a guiding failure.
    Flag(bool),
    /// Outcome-only events carry no value.
    Empty,
}

impl EventPayload {
    /// Whether this payload is the shape `kind` carries.
    #[must_use]
    pub const fn fits(&self, kind: EventType) -> bool {
        match kind {
            EventType::SlewTarget
            | EventType::PointingExpAndPlateSolve
            | EventType::AllSkySolveTime
            | EventType::AutoFocus
            | EventType::FilterChange
            | EventType::Wait
            | EventType::GuiderStartUp
            | EventType::GuiderSettle => matches!(self, Self::Duration(_)),
            EventType::PointingErrorObjectSlew
            | EventType::PointingErrorCenterSlew
            | EventType::Hfd
            | EventType::Fwhm => matches!(self, Self::Measurement(_)),
            EventType::Exposure => matches!(self, Self::Exposure(_)),
            EventType::TargetStart | EventType::ScriptError => matches!(self, Self::Note(_)),
            EventType::AutoguidingFailed
            | EventType::ExcessiveGuidingErrors
            | EventType::GuiderStoppedOrLostStar => matches!(self, Self::Flag(_)),
            EventType::PlateSolve
            | EventType::AllSkySolve
            | EventType::AutoFocusResult
            | EventType::ScriptAborted => matches!(self, Self::Empty),
        }
    }

    /// The numeric value of a duration or measurement payload.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Duration(v) | Self::Measurement(v) => Some(*v),
            _ => None,
        }
    }
}

/// One recognized occurrence in a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub kind: EventType,
    /// Time of the line that opened the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    /// Time of the line that closed a span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    /// Zero-based index of the line the event was recognized on.
    pub line: usize,
    pub success: bool,
    /// Target that was open when the event was recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetId>,
    pub payload: EventPayload,
}

impl LogEvent {
    pub(crate) fn new(kind: EventType, line: usize, payload: EventPayload) -> Self {
        debug_assert!(payload.fits(kind), "{kind} cannot carry {payload:?}");
        Self {
            kind,
            start: None,
            end: None,
            line,
            success: true,
            target: None,
            payload,
        }
    }

    pub(crate) fn starting(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub(crate) fn ending(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub(crate) fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Duration or measurement value, if the payload has one.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.payload.value()
    }

    #[must_use]
    pub const fn exposure(&self) -> Option<&Exposure> {
        match &self.payload {
            EventPayload::Exposure(exposure) => Some(exposure),
            _ => None,
        }
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Note(note) => Some(note),
            _ => None,
        }
    }
}
