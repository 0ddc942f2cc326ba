//! Autoguider start-up, settling and failures.

use super::marker::{
    AUTOGUIDING_AT, AUTOGUIDING_FAILED, CONTINUING_UNGUIDED, EXCESSIVE_GUIDING_ERRORS,
    GUIDER_CHECK_OK, GUIDER_STOPPED, IMAGING_TO, TRYING_TO_AUTOGUIDE,
};
use super::{ParseContext, RuleMiss, RuleResult, require};
use crate::cursor::ScanLimit;
use crate::event::EventPayload;
use crate::event_type::EventType;

/// Lines after a guiding failure within which the runner must say how it recovered.
const RECOVERY_LOOKAHEAD: usize = 5;

const FAILURES: [(&str, EventType); 3] = [
    (AUTOGUIDING_FAILED, EventType::AutoguidingFailed),
    (EXCESSIVE_GUIDING_ERRORS, EventType::ExcessiveGuidingErrors),
    (GUIDER_STOPPED, EventType::GuiderStoppedOrLostStar),
];

/// Time from `trying to autoguide` until `autoguiding at`.
pub fn guider_start_up(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), TRYING_TO_AUTOGUIDE)?;

    ctx.scan_forward(ScanLimit::Unbounded)
        .find(|(_, line)| line.contains(AUTOGUIDING_AT))
        .map_or(Err(RuleMiss::BoundExceeded), |(end, _)| {
            ctx.span(EventType::GuiderStartUp, ctx.index(), end)
        })
}

/// Time from `imaging to` until the guider reports it has settled.
///
/// Opened on the `guider check ok` line and resolved by looking back.
pub fn guider_settle(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), GUIDER_CHECK_OK)?;

    ctx.scan_backward(ScanLimit::Unbounded)
        .find(|(_, line)| line.contains(IMAGING_TO))
        .map_or(Err(RuleMiss::BoundExceeded), |(begin, _)| {
            ctx.span(EventType::GuiderSettle, begin, ctx.index())
        })
}

/// A guiding failure followed by a recovery within a few lines.
///
/// The flag records whether imaging continued unguided; failures with no
/// recovery message are not reported.
pub fn guider_failure(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    let (_, kind) = FAILURES
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .ok_or(RuleMiss::NoMatch)?;

    for (_, next) in ctx.scan_forward(ScanLimit::Lines(RECOVERY_LOOKAHEAD)) {
        let unguided = if next.contains(CONTINUING_UNGUIDED) {
            true
        } else if next.contains(AUTOGUIDING_AT) || next.contains(GUIDER_CHECK_OK) {
            false
        } else {
            continue;
        };
        return Ok(ctx
            .event(*kind, EventPayload::Flag(unguided))?
            .with_success(false));
    }
    Err(RuleMiss::BoundExceeded)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[test]
    fn test_guider_start_up_until_guiding() {
        let fixture = Fixture::new(&[
            "00:01:11 Trying to autoguide on star",
            "00:01:20 (guide star at 100, 200)",
            "00:01:41 Autoguiding at 2.0 sec. exposure",
        ]);
        assert_eq!(guider_start_up(&fixture.at(0)).unwrap().value(), Some(30.0));
    }

    #[test]
    fn test_guider_settle_looks_back_to_imaging() {
        let fixture = Fixture::new(&[
            "00:01:00 Imaging to M42-001",
            "00:01:11 Trying to autoguide on star",
            "00:01:41 Autoguiding at 2.0 sec. exposure",
            "00:02:00 Guider check OK",
        ]);
        let event = guider_settle(&fixture.at(3)).unwrap();

        assert_eq!(event.kind, EventType::GuiderSettle);
        assert_eq!(event.value(), Some(60.0));
        assert_eq!(event.line, 3);
    }

    #[test]
    fn test_guider_settle_without_imaging_exceeds_bound() {
        let fixture = Fixture::new(&["00:02:00 Guider check OK"]);
        assert_eq!(guider_settle(&fixture.at(0)), Err(RuleMiss::BoundExceeded));
    }

    #[test]
    fn test_failure_with_unguided_recovery() {
        let fixture = Fixture::new(&[
            "00:30:00 **Autoguiding failed",
            "00:30:01 (star lost)",
            "00:30:02 Continuing unguided",
        ]);
        let event = guider_failure(&fixture.at(0)).unwrap();

        assert_eq!(event.kind, EventType::AutoguidingFailed);
        assert_eq!(event.payload, EventPayload::Flag(true));
        assert!(!event.success);
    }

    #[test]
    fn test_failure_with_guiding_resumed() {
        let fixture = Fixture::new(&[
            "00:30:00 Guider stopped or lost star",
            "00:30:20 Autoguiding at 2.0 sec. exposure",
        ]);
        let event = guider_failure(&fixture.at(0)).unwrap();

        assert_eq!(event.kind, EventType::GuiderStoppedOrLostStar);
        assert_eq!(event.payload, EventPayload::Flag(false));
    }

    #[test]
    fn test_failure_without_recovery_is_not_reported() {
        let fixture = Fixture::new(&[
            "00:30:00 Excessive guiding errors",
            "00:30:01 a",
            "00:30:02 b",
            "00:30:03 c",
            "00:30:04 d",
            "00:30:05 e",
            "00:30:06 Continuing unguided",
        ]);
        assert_eq!(guider_failure(&fixture.at(0)), Err(RuleMiss::BoundExceeded));
    }
}
