//! Daily-log parsing pipeline.
//!
//! Raw text is split into per-day [`types::DateBlock`]s ([`segment`]), each line
//! is bucketed by keyword ([`classify`]), and each bucket is collapsed with
//! containment-based deduplication ([`dedup`]). [`pipeline::parse`] composes the
//! three.

pub mod classify;
pub mod dedup;
pub mod pipeline;
pub mod segment;
pub mod types;

pub use classify::classify;
pub use dedup::deduplicate;
pub use pipeline::{check_input_len, current_week_range, parse};
pub use segment::segment;
pub use types::{Category, DateBlock, ParseResult, WeekRange};
