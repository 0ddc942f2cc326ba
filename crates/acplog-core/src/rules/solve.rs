//! Plate solving, both the regular pointing update and all-sky solutions.

use super::marker::{
    AIMING_FAILED, ALL_SKY_ATTEMPT, ALL_SKY_FAILED, ALL_SKY_INCORRECT, ALL_SKY_SUCCESS,
    PLATE_SOLVE_FAILURES, SOLVED, TARGET_CENTERED, UPDATING_POINTING,
};
use super::{ParseContext, RuleMiss, RuleResult, find_marker, require};
use crate::cursor::ScanLimit;
use crate::event::EventPayload;
use crate::event_type::EventType;

/// Time from `updating pointing` until `target is now centered`.
pub fn pointing_exp_and_plate_solve(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), UPDATING_POINTING)?;

    for (index, line) in ctx.scan_forward(ScanLimit::Unbounded) {
        if line.contains(AIMING_FAILED) {
            return Err(RuleMiss::Excluded {
                marker: AIMING_FAILED,
            });
        }
        if line.contains(TARGET_CENTERED) {
            return ctx.span(EventType::PointingExpAndPlateSolve, ctx.index(), index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Outcome of a regular plate solve.
pub fn plate_solve(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    let success = if line.contains(SOLVED) {
        true
    } else if find_marker(line, &PLATE_SOLVE_FAILURES).is_some() {
        false
    } else {
        return Err(RuleMiss::NoMatch);
    };
    Ok(ctx
        .event(EventType::PlateSolve, EventPayload::Empty)?
        .with_success(success))
}

/// Time from `attempting all-sky plate solution` until it succeeds.
pub fn all_sky_solve_time(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), ALL_SKY_ATTEMPT)?;

    for (index, line) in ctx.scan_forward(ScanLimit::Unbounded) {
        if let Some(marker) = find_marker(line, &[ALL_SKY_FAILED, ALL_SKY_INCORRECT]) {
            return Err(RuleMiss::Excluded { marker });
        }
        if line.contains(ALL_SKY_SUCCESS) {
            return ctx.span(EventType::AllSkySolveTime, ctx.index(), index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Outcome of an all-sky solve.
pub fn all_sky_solve(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    let success = if line.contains(ALL_SKY_SUCCESS) {
        true
    } else if find_marker(line, &[ALL_SKY_FAILED, ALL_SKY_INCORRECT]).is_some() {
        false
    } else {
        return Err(RuleMiss::NoMatch);
    };
    Ok(ctx
        .event(EventType::AllSkySolve, EventPayload::Empty)?
        .with_success(success))
}
