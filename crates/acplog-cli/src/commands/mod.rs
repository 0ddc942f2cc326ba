//! CLI subcommand implementations.

pub mod events;
pub mod summary;
pub mod targets;
pub mod util;
