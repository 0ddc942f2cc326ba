//! Event type enum as the single source of truth for event type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every kind of event the marker rules can recognize in a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    TargetStart,
    Exposure,
    SlewTarget,
    PointingErrorObjectSlew,
    PointingErrorCenterSlew,
    PointingExpAndPlateSolve,
    PlateSolve,
    AllSkySolve,
    AllSkySolveTime,
    AutoFocus,
    AutoFocusResult,
    Hfd,
    Fwhm,
    FilterChange,
    Wait,
    GuiderStartUp,
    GuiderSettle,
    AutoguidingFailed,
    ExcessiveGuidingErrors,
    GuiderStoppedOrLostStar,
    ScriptError,
    ScriptAborted,
}

impl EventType {
    /// All variants, in declaration order.
    pub const ALL: [Self; 22] = [
        Self::TargetStart,
        Self::Exposure,
        Self::SlewTarget,
        Self::PointingErrorObjectSlew,
        Self::PointingErrorCenterSlew,
        Self::PointingExpAndPlateSolve,
        Self::PlateSolve,
        Self::AllSkySolve,
        Self::AllSkySolveTime,
        Self::AutoFocus,
        Self::AutoFocusResult,
        Self::Hfd,
        Self::Fwhm,
        Self::FilterChange,
        Self::Wait,
        Self::GuiderStartUp,
        Self::GuiderSettle,
        Self::AutoguidingFailed,
        Self::ExcessiveGuidingErrors,
        Self::GuiderStoppedOrLostStar,
        Self::ScriptError,
        Self::ScriptAborted,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TargetStart => "target_start",
            Self::Exposure => "exposure",
            Self::SlewTarget => "slew_target",
            Self::PointingErrorObjectSlew => "pointing_error_object_slew",
            Self::PointingErrorCenterSlew => "pointing_error_center_slew",
            Self::PointingExpAndPlateSolve => "pointing_exp_and_plate_solve",
            Self::PlateSolve => "plate_solve",
            Self::AllSkySolve => "all_sky_solve",
            Self::AllSkySolveTime => "all_sky_solve_time",
            Self::AutoFocus => "auto_focus",
            Self::AutoFocusResult => "auto_focus_result",
            Self::Hfd => "hfd",
            Self::Fwhm => "fwhm",
            Self::FilterChange => "filter_change",
            Self::Wait => "wait",
            Self::GuiderStartUp => "guider_start_up",
            Self::GuiderSettle => "guider_settle",
            Self::AutoguidingFailed => "autoguiding_failed",
            Self::ExcessiveGuidingErrors => "excessive_guiding_errors",
            Self::GuiderStoppedOrLostStar => "guider_stopped_or_lost_star",
            Self::ScriptError => "script_error",
            Self::ScriptAborted => "script_aborted",
        }
    }

    /// Whether this is one of the guiding failure kinds.
    #[must_use]
    pub const fn is_guiding_failure(&self) -> bool {
        matches!(
            self,
            Self::AutoguidingFailed | Self::ExcessiveGuidingErrors | Self::GuiderStoppedOrLostStar
        )
    }

    /// Whether this is one of the two pointing error kinds.
    #[must_use]
    pub const fn is_pointing_error(&self) -> bool {
        matches!(
            self,
            Self::PointingErrorObjectSlew | Self::PointingErrorCenterSlew
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event type strings.
#[derive(Debug, Clone)]
pub struct UnknownEventType(String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}
