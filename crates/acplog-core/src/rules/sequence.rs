//! Waits and script-level interruptions.

use super::marker::{SCRIPT_ABORTED, SCRIPT_ERROR, WAIT_FINISHED, WAIT_UNTIL};
use super::{ParseContext, RuleMiss, RuleResult, require};
use crate::cursor::ScanLimit;
use crate::event::EventPayload;
use crate::event_type::EventType;

/// Time spent in `wait until` before `wait finished`.
pub fn wait(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), WAIT_UNTIL)?;

    ctx.scan_forward(ScanLimit::Unbounded)
        .find(|(_, line)| line.contains(WAIT_FINISHED))
        .map_or(Err(RuleMiss::BoundExceeded), |(end, _)| {
            ctx.span(EventType::Wait, ctx.index(), end)
        })
}

/// `**Script Error ...`, keeping the message text.
pub fn script_error(ctx: &ParseContext<'_>) -> RuleResult {
    let start = ctx.line().find(SCRIPT_ERROR).ok_or(RuleMiss::NoMatch)? + SCRIPT_ERROR.len();
    let message = ctx.raw_line()[start..].trim().to_string();
    Ok(ctx
        .event(EventType::ScriptError, EventPayload::Note(message))?
        .with_success(false))
}

pub fn script_aborted(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), SCRIPT_ABORTED)?;
    Ok(ctx
        .event(EventType::ScriptAborted, EventPayload::Empty)?
        .with_success(false))
}
