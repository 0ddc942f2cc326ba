//! Targets, exposures, filter changes and focus quality.

use super::marker::{
    AUTOFOCUS_FAILED, AUTOFOCUS_SUCCESSFUL, GUIDE_STAR, HFD, IMAGE_FWHM_IS, IMAGING_TO,
    STARTING_TARGET, SWITCHING_FROM, TAKING, UPDATING_POINTING,
};
use super::{ParseContext, RuleMiss, RuleResult, find_marker, number_after, number_between, require};
use crate::cursor::ScanLimit;
use crate::event::EventPayload;
use crate::event_type::EventType;
use crate::types::Exposure;

/// How far back an exposure line may be from its `imaging to` line.
const EXPOSURE_LOOKBACK: usize = 10;

/// Lines after a filter switch within which the exposure must start.
const FILTER_CHANGE_LOOKAHEAD: usize = 5;

/// Lines after a successful auto-focus within which the HFD is reported.
const HFD_LOOKAHEAD: usize = 10;

/// `Starting target: <name>` opens a new target.
pub fn target_start(ctx: &ParseContext<'_>) -> RuleResult {
    let start = ctx.line().find(STARTING_TARGET).ok_or(RuleMiss::NoMatch)? + STARTING_TARGET.len();
    let name = ctx.raw_line()[start..]
        .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_end();
    if name.is_empty() {
        return Err(RuleMiss::NoMatch);
    }
    ctx.event(EventType::TargetStart, EventPayload::Note(name.to_string()))
}

/// `(taking 300 sec. exposure, Red filter, binning = 1)` under an `imaging to` line.
///
/// Exposures taken for pointing updates are not imaging and are rejected.
pub fn exposure(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    require(line, TAKING)?;

    let mut imaging = false;
    for (_, previous) in ctx.scan_backward(ScanLimit::Lines(EXPOSURE_LOOKBACK)) {
        if previous.contains(UPDATING_POINTING) {
            return Err(RuleMiss::Excluded {
                marker: UPDATING_POINTING,
            });
        }
        if previous.contains(IMAGING_TO) {
            imaging = true;
            break;
        }
    }
    if !imaging {
        return Err(RuleMiss::BoundExceeded);
    }

    let duration = number_between(line, TAKING, "sec")?;
    let filter = exposure_filter(ctx.raw_line());
    let bin = exposure_bin(line);
    ctx.event(
        EventType::Exposure,
        EventPayload::Exposure(Exposure::new(duration, filter, bin)),
    )
}

/// Filter name between the first comma and the word `filter`, or `""`.
fn exposure_filter(raw: &str) -> &str {
    let Some(comma) = raw.find(',') else {
        return "";
    };
    let rest = &raw[comma + 1..];
    rest.to_ascii_lowercase()
        .find("filter")
        .map_or("", |end| rest[..end].trim())
}

/// Binning factor after `binning =`, or 0 when absent.
fn exposure_bin(line: &str) -> u32 {
    line.find("binning")
        .map(|at| &line[at + "binning".len()..])
        .map(|rest| rest.trim_start_matches(|c: char| c == '=' || c.is_whitespace()))
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(0)
}

/// Time from `switching from` until the next exposure starts.
pub fn filter_change(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), SWITCHING_FROM)?;

    for (index, line) in ctx.scan_forward(ScanLimit::Lines(FILTER_CHANGE_LOOKAHEAD)) {
        if line.contains(GUIDE_STAR) {
            return Err(RuleMiss::Excluded { marker: GUIDE_STAR });
        }
        if line.contains(TAKING) {
            return ctx.span(EventType::FilterChange, ctx.index(), index);
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// `Image FWHM is 3.2 arcsec` for an imaging frame.
///
/// The nearest preceding marker decides: `imaging to` accepts, while a pointing
/// update or an earlier FWHM report means this measurement is not from imaging.
pub fn fwhm(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    require(line, IMAGE_FWHM_IS)?;

    let mut imaging = false;
    for (_, previous) in ctx.scan_backward(ScanLimit::Unbounded) {
        if let Some(marker) = find_marker(previous, &[UPDATING_POINTING, IMAGE_FWHM_IS]) {
            return Err(RuleMiss::Excluded { marker });
        }
        if previous.contains(IMAGING_TO) {
            imaging = true;
            break;
        }
    }
    if !imaging {
        return Err(RuleMiss::BoundExceeded);
    }

    let arcsec = number_between(line, IMAGE_FWHM_IS, "arcsec")?;
    ctx.event(EventType::Fwhm, EventPayload::Measurement(arcsec))
}

/// HFD reported shortly after a successful auto-focus.
pub fn hfd(ctx: &ParseContext<'_>) -> RuleResult {
    require(ctx.line(), AUTOFOCUS_SUCCESSFUL)?;

    for (_, line) in ctx.scan_forward(ScanLimit::Lines(HFD_LOOKAHEAD)) {
        if line.contains(AUTOFOCUS_SUCCESSFUL) {
            return Err(RuleMiss::Excluded {
                marker: AUTOFOCUS_SUCCESSFUL,
            });
        }
        if line.contains(HFD) {
            let value = number_after(line, HFD)?;
            return ctx.event(EventType::Hfd, EventPayload::Measurement(value));
        }
    }
    Err(RuleMiss::BoundExceeded)
}

/// Auto-focus outcome: success or failure.
pub fn auto_focus_count(ctx: &ParseContext<'_>) -> RuleResult {
    let line = ctx.line();
    let success = if line.contains(AUTOFOCUS_SUCCESSFUL) {
        true
    } else if line.contains(AUTOFOCUS_FAILED) {
        false
    } else {
        return Err(RuleMiss::NoMatch);
    };
    Ok(ctx
        .event(EventType::AutoFocusResult, EventPayload::Empty)?
        .with_success(success))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[test]
    fn test_target_name_keeps_case() {
        let fixture = Fixture::new(&["00:00:01 Starting target: NGC 2264 Cone"]);
        let event = target_start(&fixture.at(0)).unwrap();

        assert_eq!(event.kind, EventType::TargetStart);
        assert_eq!(event.note(), Some("NGC 2264 Cone"));
    }

    #[test]
    fn test_target_without_name_is_ignored() {
        let fixture = Fixture::new(&["00:00:01 Starting target:   "]);
        assert_eq!(target_start(&fixture.at(0)), Err(RuleMiss::NoMatch));
    }

    #[test]
    fn test_imaging_exposure_is_parsed() {
        let fixture = Fixture::new(&[
            "00:01:00 Imaging to M42-S001-R001-C001-Red",
            "00:01:01 Switching from Luminance to Red filter for imaging",
            "00:01:10 (taking 300 sec. exposure, Red filter, binning = 2)",
        ]);
        let event = exposure(&fixture.at(2)).unwrap();

        assert_eq!(event.exposure(), Some(&Exposure::new(300.0, "Red", 2)));
    }

    #[test]
    fn test_pointing_exposure_is_rejected() {
        let fixture = Fixture::new(&[
            "00:00:40 Imaging to M42-S001-R001-C001-Red",
            "00:00:50 Updating pointing...",
            "00:00:51 (taking 15 sec. exposure, Luminance filter, binning = 2)",
        ]);
        assert_eq!(
            exposure(&fixture.at(2)),
            Err(RuleMiss::Excluded {
                marker: UPDATING_POINTING
            })
        );
    }

    #[test]
    fn test_exposure_secondary_fields_default() {
        let fixture = Fixture::new(&["00:01:00 Imaging to dark", "00:01:01 (taking 60 sec. exposure)"]);
        let event = exposure(&fixture.at(1)).unwrap();

        assert_eq!(event.exposure(), Some(&Exposure::new(60.0, "", 0)));
    }

    #[test]
    fn test_exposure_with_bad_duration_is_malformed() {
        let fixture = Fixture::new(&["00:01:00 Imaging to M42", "00:01:01 (taking ?? sec. exposure, Red filter, binning = 1)"]);
        assert!(matches!(exposure(&fixture.at(1)), Err(RuleMiss::MalformedNumber { .. })));
    }

    #[test]
    fn test_filter_change_ends_at_next_exposure() {
        let fixture = Fixture::new(&[
            "00:01:01 Switching from Luminance to Red filter for imaging",
            "00:01:02 (using Red filter focus offset of 10)",
            "00:01:09 (taking 300 sec. exposure, Red filter, binning = 1)",
        ]);
        assert_eq!(filter_change(&fixture.at(0)).unwrap().value(), Some(8.0));
    }

    #[test]
    fn test_filter_change_for_guide_star_is_excluded() {
        let fixture = Fixture::new(&[
            "00:01:01 Switching from Red to Luminance filter",
            "00:01:02 (guide star acquisition)",
            "00:01:09 (taking 5 sec. exposure, Luminance filter, binning = 1)",
        ]);
        assert_eq!(
            filter_change(&fixture.at(0)),
            Err(RuleMiss::Excluded { marker: GUIDE_STAR })
        );
    }

    #[test]
    fn test_filter_change_beyond_five_lines_is_dropped() {
        let fixture = Fixture::new(&[
            "00:01:01 Switching from Luminance to Red filter",
            "00:01:02 a",
            "00:01:03 b",
            "00:01:04 c",
            "00:01:05 d",
            "00:01:06 e",
            "00:01:09 (taking 300 sec. exposure, Red filter, binning = 1)",
        ]);
        assert_eq!(filter_change(&fixture.at(0)), Err(RuleMiss::BoundExceeded));
    }

    #[test]
    fn test_fwhm_accepted_only_after_imaging() {
        let fixture = Fixture::new(&[
            "00:01:00 Imaging to M42-001",
            "# guider noise",
            "00:06:00 Image FWHM is 3.25 arcsec (1.60 pixels)",
            "00:06:10 Updating pointing...",
            "00:06:40 Image FWHM is 4.00 arcsec (2.00 pixels)",
        ]);

        let event = fwhm(&fixture.at(2)).unwrap();
        assert_eq!(event.value(), Some(3.25));

        assert_eq!(
            fwhm(&fixture.at(4)),
            Err(RuleMiss::Excluded {
                marker: UPDATING_POINTING
            })
        );
    }

    #[test]
    fn test_second_fwhm_without_imaging_is_excluded() {
        let fixture = Fixture::new(&[
            "00:01:00 Imaging to M42-001",
            "00:06:00 Image FWHM is 3.25 arcsec",
            "00:06:40 Image FWHM is 3.30 arcsec",
        ]);
        assert_eq!(
            fwhm(&fixture.at(2)),
            Err(RuleMiss::Excluded {
                marker: IMAGE_FWHM_IS
            })
        );
    }

    #[test]
    fn test_hfd_follows_successful_focus() {
        let fixture = Fixture::new(&[
            "01:03:01 Auto-focus successful!",
            "01:03:01 (filter offset 0)",
            "01:03:02 HFD = 2.37",
        ]);
        let event = hfd(&fixture.at(0)).unwrap();

        assert_eq!(event.kind, EventType::Hfd);
        assert_eq!(event.value(), Some(2.37));
    }

    #[test]
    fn test_hfd_after_another_focus_fails() {
        let fixture = Fixture::new(&[
            "01:03:01 Auto-focus successful!",
            "01:10:01 Auto-focus successful!",
            "01:10:02 HFD = 2.10",
        ]);
        assert!(matches!(hfd(&fixture.at(0)), Err(RuleMiss::Excluded { .. })));
        assert!(hfd(&fixture.at(1)).is_ok());
    }

    #[test]
    fn test_auto_focus_outcomes_are_counted() {
        let fixture = Fixture::new(&["01:03:01 Auto-focus successful!", "02:03:01 **Autofocus failed"]);

        assert!(auto_focus_count(&fixture.at(0)).unwrap().success);
        assert!(!auto_focus_count(&fixture.at(1)).unwrap().success);
    }
}
