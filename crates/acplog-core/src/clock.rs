//! Timestamps for log lines.
//!
//! Lines carry only a `hh:mm:ss` prefix; the calendar date comes from the
//! log's opening header.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Matches the date in `log opened` / `log closed` headers, e.g. `01-Jan-2020 00:00:00`.
static HEADER_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"log (?:opened|closed)\s+(\d{1,2}-[A-Za-z]{3}-\d{4} \d{1,2}:\d{2}:\d{2})")
        .unwrap()
});

const HEADER_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Length of the `hh:mm:ss` prefix.
const TIME_PREFIX_LEN: usize = 8;

/// Parses the date from a `log opened` or `log closed` line (any case).
pub fn parse_header_date(line: &str) -> Option<NaiveDateTime> {
    let caps = HEADER_DATE_RE.captures(line)?;
    NaiveDateTime::parse_from_str(&caps[1], HEADER_DATE_FORMAT).ok()
}

/// Parses the `hh:mm:ss` prefix of a line.
pub fn parse_time_prefix(line: &str) -> Option<NaiveTime> {
    let prefix = line.get(..TIME_PREFIX_LEN)?;
    NaiveTime::parse_from_str(prefix, "%H:%M:%S").ok()
}

/// Seconds from `start` to `end`, adding one day when `end` is earlier.
///
/// An end before its start means the span crossed midnight.
#[expect(clippy::cast_precision_loss, reason = "spans are at most a day of milliseconds")]
pub fn span_seconds(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let end = if end < start { end + Duration::days(1) } else { end };
    (end - start).num_milliseconds() as f64 / 1000.0
}

/// Resolves line times against the moment the log was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogClock {
    opened: NaiveDateTime,
}

impl LogClock {
    #[must_use]
    pub const fn new(opened: NaiveDateTime) -> Self {
        Self { opened }
    }

    #[must_use]
    pub const fn opened(&self) -> NaiveDateTime {
        self.opened
    }

    /// Timestamp of a line, or `None` if it has no time prefix.
    ///
    /// Times earlier than the opening time belong to the following day.
    pub fn stamp(&self, line: &str) -> Option<NaiveDateTime> {
        let time = parse_time_prefix(line)?;
        let stamped = self.opened.date().and_time(time);
        if stamped < self.opened {
            Some(stamped + Duration::days(1))
        } else {
            Some(stamped)
        }
    }
}
