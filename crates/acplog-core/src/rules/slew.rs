//! Slews, auto-focus runs and the pointing errors that follow them.

use super::marker::{
    ALL_SKY_SUCCESS, AUTOFOCUS_FAILED, AUTOFOCUS_FINISHED, IMAGING_TO, LOG_CLOSED,
    PLATE_SOLVE_FAILURES, POINTING_ERROR_IS, RE_SLEW_TO_TARGET, SLEW_COMPLETE, START_SLEW_TO,
    START_SLEW_TO_AUTOFOCUS, STARTING_TARGET, UPDATING_POINTING,
};
use super::{ParseContext, RuleMiss, RuleResult, find_marker, number_between, require};
use crate::cursor::ScanLimit;
use crate::event::EventPayload;
use crate::event_type::EventType;

/// A slew to something other than the auto-focus star.
fn is_object_slew(line: &str) -> bool {
    line.contains(START_SLEW_TO) && !line.contains(START_SLEW_TO_AUTOFOCUS)
}

fn after_re_slew(ctx: &ParseContext<'_>) -> bool {
    ctx.previous_line().contains(RE_SLEW_TO_TARGET)
}

/// Pointing error event closed by the `pointing error is` line at `end`.
fn pointing_error_at(ctx: &ParseContext<'_>, kind: EventType, end: usize) -> RuleResult {
    let arcmin = number_between(ctx.at(end).line(), POINTING_ERROR_IS, "arcmin")?;
    Ok(ctx
        .event(kind, EventPayload::Measurement(arcmin))?
        .ending(ctx.stamp_at(end)?))
}

/// Time from the slew to the focus star until the scope is back on target.
///
/// The run ends at the first pointing error reported after `autofocus
/// finished`. A run with no pointing update before imaging resumes has no end
/// and emits nothing.
pub fn auto_focus_time(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), START_SLEW_TO_AUTOFOCUS)?;
    if after_re_slew(ctx) {
        return Err(RuleMiss::Excluded {
            marker: RE_SLEW_TO_TARGET,
        });
    }

    let mut finished = false;
    for (index, line) in ctx.scan_forward(ScanLimit::Unbounded) {
        if line.contains(AUTOFOCUS_FAILED) {
            return Err(RuleMiss::Excluded {
                marker: AUTOFOCUS_FAILED,
            });
        }
        if line.contains(LOG_CLOSED) {
            break;
        }
        if !finished {
            finished = line.contains(AUTOFOCUS_FINISHED);
        } else if line.contains(POINTING_ERROR_IS) {
            return ctx.span(EventType::AutoFocus, ctx.index(), index);
        } else if line.contains(IMAGING_TO) || line.contains(STARTING_TARGET) {
            break;
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Time from `start slew to` until `slew complete`.
pub fn slew_target(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), START_SLEW_TO)?;
    if after_re_slew(ctx) {
        return Err(RuleMiss::Excluded {
            marker: RE_SLEW_TO_TARGET,
        });
    }

    for (index, line) in ctx.scan_forward(ScanLimit::Unbounded) {
        if let Some(marker) = find_marker(line, &[UPDATING_POINTING, RE_SLEW_TO_TARGET, START_SLEW_TO]) {
            return Err(RuleMiss::Excluded { marker });
        }
        if line.contains(SLEW_COMPLETE) {
            return ctx.span(EventType::SlewTarget, ctx.index(), index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Pointing error after re-centering on the target.
pub fn center_slew_pointing_error(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), RE_SLEW_TO_TARGET)?;
    let next = ctx.next_line();
    if next.contains(START_SLEW_TO_AUTOFOCUS) {
        return Err(RuleMiss::Excluded {
            marker: START_SLEW_TO_AUTOFOCUS,
        });
    }

    // The slew that carries out the re-slew is part of this span.
    let mut scan = ctx.scan_forward(ScanLimit::Unbounded);
    if next.contains(START_SLEW_TO) {
        scan.next();
    }

    for (index, line) in scan {
        if let Some(marker) = find_marker(line, &PLATE_SOLVE_FAILURES) {
            return Err(RuleMiss::Excluded { marker });
        }
        if line.contains(POINTING_ERROR_IS) {
            return pointing_error_at(ctx, EventType::PointingErrorCenterSlew, index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Pointing error after slewing to a new object.
pub fn object_slew_pointing_error(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    if !is_object_slew(line) && !line.contains(ALL_SKY_SUCCESS) {
        return Err(RuleMiss::NoMatch);
    }
    if after_re_slew(ctx) {
        return Err(RuleMiss::Excluded {
            marker: RE_SLEW_TO_TARGET,
        });
    }

    for (index, line) in ctx.scan_forward(ScanLimit::Unbounded) {
        if let Some(marker) = find_marker(line, &PLATE_SOLVE_FAILURES) {
            return Err(RuleMiss::Excluded { marker });
        }
        if line.contains(RE_SLEW_TO_TARGET) {
            return Err(RuleMiss::Excluded {
                marker: RE_SLEW_TO_TARGET,
            });
        }
        if is_object_slew(line) {
            return Err(RuleMiss::Excluded {
                marker: START_SLEW_TO,
            });
        }
        if line.contains(POINTING_ERROR_IS) {
            return pointing_error_at(ctx, EventType::PointingErrorObjectSlew, index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Center-slew pointing error if the line opens one, otherwise object-slew.
pub fn pointing_error(ctx: &ParseContext<'_>) -> RuleResult {
    center_slew_pointing_error(ctx).or_else(|_| object_slew_pointing_error(ctx))
}
