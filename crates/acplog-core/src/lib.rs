//! Parsing and statistics for ACP observatory logs.
//!
//! A [`Log`] is built from the lines of one log file and parsed into typed
//! [`LogEvent`]s by the marker rules in [`rules`]. Events are then summarized
//! per target, per log and across a collection of logs.

mod batch;
pub mod clock;
pub mod cursor;
mod event;
pub mod event_type;
mod log;
pub mod rules;
mod stats;
mod summary;
mod target;
mod types;

pub use batch::{LogSource, parse_logs};
pub use event::{EventPayload, LogEvent};
pub use event_type::{EventType, UnknownEventType};
pub use log::{Log, LogError, ParseReport, ParseState};
pub use stats::EventStats;
pub use summary::{CollectionSummary, LogCollectionSummary, LogSummary};
pub use target::{Target, TargetSummary, TargetView};
pub use types::{Exposure, ExposureSummary, SuccessCounter, TargetId, group_exposures};
