//! Averages and counters over a set of events.
//!
//! The same figures are reported for a target, a log and a collection of
//! logs; only the set of events differs.

use serde::{Deserialize, Serialize};

use crate::event::{EventPayload, LogEvent};
use crate::event_type::EventType;
use crate::types::{SuccessCounter, mean, round0, round2};

/// Mean of the values of `kind` events, unrounded.
pub fn mean_of<'a>(events: impl IntoIterator<Item = &'a LogEvent>, kind: EventType) -> f64 {
    mean(
        events
            .into_iter()
            .filter(|e| e.kind == kind)
            .filter_map(LogEvent::value),
    )
}

/// Sum of the values of `kind` events.
pub fn total_of<'a>(events: impl IntoIterator<Item = &'a LogEvent>, kind: EventType) -> f64 {
    events
        .into_iter()
        .filter(|e| e.kind == kind)
        .filter_map(LogEvent::value)
        .sum()
}

pub fn count_of<'a>(events: impl IntoIterator<Item = &'a LogEvent>, kind: EventType) -> usize {
    events.into_iter().filter(|e| e.kind == kind).count()
}

/// Successes and failures of `kind` events.
pub fn outcomes_of<'a>(events: impl IntoIterator<Item = &'a LogEvent>, kind: EventType) -> SuccessCounter {
    let mut counter = SuccessCounter::default();
    for event in events.into_iter().filter(|e| e.kind == kind) {
        counter.record(event.success);
    }
    counter
}

/// Quality and timing figures for a set of events.
///
/// Measurements are rounded to two decimals, durations to whole seconds.
/// Every average is 0 when there is nothing to average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    pub average_fwhm: f64,
    pub average_hfd: f64,
    pub average_object_slew_pointing_error: f64,
    pub average_center_slew_pointing_error: f64,
    pub average_slew_time: f64,
    pub average_auto_focus_time: f64,
    pub average_filter_change_time: f64,
    pub average_plate_solve_time: f64,
    pub average_all_sky_solve_time: f64,
    pub average_guider_start_up_time: f64,
    pub average_guider_settle_time: f64,
    pub auto_focus: SuccessCounter,
    pub plate_solve: SuccessCounter,
    pub all_sky_solve: SuccessCounter,
    pub guiding_failures: usize,
    /// Guiding failures after which imaging carried on unguided.
    pub continued_unguided: usize,
    pub script_errors: usize,
    pub script_aborts: usize,
}

impl EventStats {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a LogEvent>) -> Self {
        let events: Vec<&LogEvent> = events.into_iter().collect();
        let all = || events.iter().copied();
        let measured = |kind| round2(mean_of(all(), kind));
        let timed = |kind| round0(mean_of(all(), kind));

        let failures = || all().filter(|e| e.kind.is_guiding_failure());

        Self {
            average_fwhm: measured(EventType::Fwhm),
            average_hfd: measured(EventType::Hfd),
            average_object_slew_pointing_error: measured(EventType::PointingErrorObjectSlew),
            average_center_slew_pointing_error: measured(EventType::PointingErrorCenterSlew),
            average_slew_time: timed(EventType::SlewTarget),
            average_auto_focus_time: timed(EventType::AutoFocus),
            average_filter_change_time: timed(EventType::FilterChange),
            average_plate_solve_time: timed(EventType::PointingExpAndPlateSolve),
            average_all_sky_solve_time: timed(EventType::AllSkySolveTime),
            average_guider_start_up_time: timed(EventType::GuiderStartUp),
            average_guider_settle_time: timed(EventType::GuiderSettle),
            auto_focus: outcomes_of(all(), EventType::AutoFocusResult),
            plate_solve: outcomes_of(all(), EventType::PlateSolve),
            all_sky_solve: outcomes_of(all(), EventType::AllSkySolve),
            guiding_failures: failures().count(),
            continued_unguided: failures()
                .filter(|e| matches!(e.payload, EventPayload::Flag(true)))
                .count(),
            script_errors: count_of(all(), EventType::ScriptError),
            script_aborts: count_of(all(), EventType::ScriptAborted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(kind: EventType, value: f64) -> LogEvent {
        LogEvent::new(kind, 0, EventPayload::Measurement(value))
    }

    fn timed(kind: EventType, seconds: f64) -> LogEvent {
        LogEvent::new(kind, 0, EventPayload::Duration(seconds))
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let none: [LogEvent; 0] = [];
        assert_eq!(EventStats::from_events(&none), EventStats::default());
    }

    #[test]
    fn test_averages_are_rounded_by_kind() {
        let events = [
            measured(EventType::Fwhm, 2.0),
            measured(EventType::Fwhm, 2.333),
            measured(EventType::Fwhm, 3.0),
            timed(EventType::SlewTarget, 10.0),
            timed(EventType::SlewTarget, 11.0),
        ];
        let stats = EventStats::from_events(&events);

        assert!((stats.average_fwhm - 2.44).abs() < 1e-9);
        assert!((stats.average_slew_time - 11.0).abs() < f64::EPSILON);
        assert!(stats.average_hfd.abs() < f64::EPSILON);
    }

    #[test]
    fn test_counters_split_success_and_failure() {
        let events = [
            LogEvent::new(EventType::AutoFocusResult, 0, EventPayload::Empty),
            LogEvent::new(EventType::AutoFocusResult, 1, EventPayload::Empty).with_success(false),
            LogEvent::new(EventType::AutoguidingFailed, 2, EventPayload::Flag(true)).with_success(false),
            LogEvent::new(EventType::GuiderStoppedOrLostStar, 3, EventPayload::Flag(false))
                .with_success(false),
        ];
        let stats = EventStats::from_events(&events);

        assert_eq!(stats.auto_focus, SuccessCounter { successes: 1, failures: 1 });
        assert_eq!(stats.guiding_failures, 2);
        assert_eq!(stats.continued_unguided, 1);
    }

    #[test]
    fn test_total_sums_values() {
        let events = [timed(EventType::Wait, 60.0), timed(EventType::Wait, 30.0)];
        assert!((total_of(&events, EventType::Wait) - 90.0).abs() < f64::EPSILON);
        assert_eq!(count_of(&events, EventType::Exposure), 0);
    }
}
