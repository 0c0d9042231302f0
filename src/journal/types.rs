//! Core daily-log type definitions.
//!
//! Defines [`Category`] (the four report buckets), [`DateBlock`] (one day of a
//! raw log), [`WeekRange`] (Monday to Friday span), and [`ParseResult`] (the
//! pipeline's derived, read-only output).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hours assumed for a day whose date marker carries no `Nh` suffix.
pub const DEFAULT_HOURS: f64 = 8.0;

/// The four buckets every log line is sorted into.
///
/// Variant order is the order categories appear in a [`ParseResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Project delivery work. The default when no keyword matches.
    Project,
    /// Service-oriented / interface-oriented capability building.
    Service,
    /// Proof-of-concept and investigation work.
    Research,
    /// Temporary work, operations, meetings, sharing, support.
    OtherAffairs,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Project,
        Category::Service,
        Category::Research,
        Category::OtherAffairs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Service => "service",
            Self::Research => "research",
            Self::OtherAffairs => "other_affairs",
        }
    }

    /// Subsection heading used for this category in a weekly report.
    pub fn report_heading(&self) -> &'static str {
        match self {
            Self::Project => "手上项目",
            Self::Service => "服务化能力建设",
            Self::Research => "预研",
            Self::OtherAffairs => "其他的事务性工作",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "service" => Ok(Self::Service),
            "research" => Ok(Self::Research),
            "other_affairs" => Ok(Self::OtherAffairs),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}

/// One day of a raw log: the date marker plus the lines written under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateBlock {
    /// `YYYY-MM-DD`, or `None` for lines that appear before any date marker.
    pub date: Option<String>,
    /// Declared work hours, [`DEFAULT_HOURS`] when not declared.
    pub hours: f64,
    /// Trimmed, non-empty lines in source order.
    pub content: Vec<String>,
}

impl DateBlock {
    pub fn new(date: Option<String>, hours: f64) -> Self {
        Self {
            date,
            hours,
            content: Vec::new(),
        }
    }

    /// A block for lines seen before the first date marker.
    pub fn undated() -> Self {
        Self::new(None, DEFAULT_HOURS)
    }
}

/// A Monday to Friday span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Output of the parsing pipeline. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub blocks: Vec<DateBlock>,
    /// Deduplicated lines per category. All four categories are always present.
    pub categories: BTreeMap<Category, Vec<String>>,
    pub week_range: WeekRange,
}

impl ParseResult {
    /// Lines for one category (empty if none).
    pub fn entries(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of declared hours across all blocks.
    pub fn total_hours(&self) -> f64 {
        self.blocks.iter().map(|b| b.hours).sum()
    }
}
