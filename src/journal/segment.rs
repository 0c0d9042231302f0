//! Date-block segmentation.
//!
//! Splits a raw multi-day log into [`DateBlock`]s. A line is a date marker when,
//! after trimming, it is `YYYYMMDD` or `YYYY-MM-DD`, optionally followed by an
//! hour suffix such as `8h`, `7.5H`, or `6 h`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{DateBlock, DEFAULT_HOURS};
use crate::error::ParseError;

static DATE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{8}|[0-9]{4}-[0-9]{2}-[0-9]{2})\s*(?:([0-9.]+)\s*[hH])?$")
        .expect("date marker pattern is valid")
});

static HOURS_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("hours pattern is valid"));

/// A parsed date-marker line.
#[derive(Debug, Clone, PartialEq)]
pub struct DateMarker {
    pub date: String,
    pub hours: f64,
}

/// Try to read `line` as a date marker.
///
/// Returns `Ok(None)` for ordinary content lines and `Err` when the line is a
/// marker whose hour suffix is not a positive integer or decimal (e.g.
/// `20251212 0h`, `20251212 8..5h`, `20251212 .5h`).
pub fn parse_marker(line: &str, line_no: usize) -> Result<Option<DateMarker>, ParseError> {
    let Some(caps) = DATE_MARKER.captures(line.trim()) else {
        return Ok(None);
    };

    let raw_date = &caps[1];
    let date = if raw_date.len() == 8 {
        normalize_compact_date(raw_date)
    } else {
        raw_date.to_string()
    };

    let hours = match caps.get(2) {
        Some(m) => parse_hours(m.as_str()).ok_or_else(|| ParseError::InvalidHours {
            line: line_no,
            value: m.as_str().to_string(),
        })?,
        None => DEFAULT_HOURS,
    };

    Ok(Some(DateMarker { date, hours }))
}

/// `20251212` → `2025-12-12`. Strings that are not a real date pass through.
fn normalize_compact_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn parse_hours(raw: &str) -> Option<f64> {
    if !HOURS_NUMBER.is_match(raw) {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h > 0.0)
}

/// Split raw log text into date blocks, preserving source order.
///
/// Empty lines are dropped. Lines before the first marker land in a single
/// undated block. A marker followed directly by another marker yields a block
/// with no content, which is kept.
pub fn segment(text: &str) -> Result<Vec<DateBlock>, ParseError> {
    let mut blocks = Vec::new();
    let mut current: Option<DateBlock> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();

        if let Some(marker) = parse_marker(line, idx + 1)? {
            if let Some(done) = current.take() {
                blocks.push(done);
            }
            current = Some(DateBlock::new(Some(marker.date), marker.hours));
            continue;
        }

        if line.is_empty() {
            continue;
        }

        current
            .get_or_insert_with(DateBlock::undated)
            .content
            .push(line.to_string());
    }

    if let Some(done) = current {
        blocks.push(done);
    }

    tracing::debug!(blocks = blocks.len(), "segmented daily log");
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_marker_with_hours() {
        let blocks = segment("20251212 8h\nA\nB").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].date.as_deref(), Some("2025-12-12"));
        assert_eq!(blocks[0].hours, 8.0);
        assert_eq!(blocks[0].content, vec!["A", "B"]);
    }

    #[test]
    fn hyphen_marker_passes_through() {
        let blocks = segment("2025-12-12 6h\n完成部署").unwrap();
        assert_eq!(blocks[0].date.as_deref(), Some("2025-12-12"));
        assert_eq!(blocks[0].hours, 6.0);
    }

    #[test]
    fn missing_hours_default_to_eight() {
        let blocks = segment("20251212\nA").unwrap();
        assert_eq!(blocks[0].hours, 8.0);
    }

    #[test]
    fn fractional_and_uppercase_hours() {
        let blocks = segment("20251212 7.5H\nA").unwrap();
        assert_eq!(blocks[0].hours, 7.5);
        let blocks = segment("20251212 6 h\nA").unwrap();
        assert_eq!(blocks[0].hours, 6.0);
    }

    #[test]
    fn unparseable_compact_date_passes_through_verbatim() {
        let blocks = segment("20251399\nA").unwrap();
        assert_eq!(blocks[0].date.as_deref(), Some("20251399"));
    }

    #[test]
    fn no_markers_yields_single_undated_block() {
        let blocks = segment("first\n\n  second  \n").unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].date.is_none());
        assert_eq!(blocks[0].hours, 8.0);
        assert_eq!(blocks[0].content, vec!["first", "second"]);
    }

    #[test]
    fn leading_undated_block_then_dated() {
        let blocks = segment("preface\n20251211\nA").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].date.is_none());
        assert_eq!(blocks[0].content, vec!["preface"]);
        assert_eq!(blocks[1].date.as_deref(), Some("2025-12-11"));
    }

    #[test]
    fn empty_marker_block_is_retained() {
        let blocks = segment("20251211 8h\n20251212 4h\nB").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].content.is_empty());
        assert_eq!(blocks[1].content, vec!["B"]);
    }

    #[test]
    fn empty_text_yields_no_blocks() {
        assert!(segment("").unwrap().is_empty());
        assert!(segment("\n \n").unwrap().is_empty());
    }

    #[test]
    fn zero_hours_is_rejected() {
        let err = segment("A\n20251212 0h").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidHours {
                line: 2,
                value: "0".into()
            }
        );
    }

    #[test]
    fn malformed_hours_is_rejected() {
        assert!(matches!(
            segment("20251212 8..5h"),
            Err(ParseError::InvalidHours { .. })
        ));
    }

    #[test]
    fn dangling_decimal_point_is_rejected() {
        for line in ["20251212 8.h\nA", "20251212 .5h\nA", "2025-12-12 .h"] {
            match segment(line) {
                Err(ParseError::InvalidHours { line: 1, value }) => {
                    assert!(value.starts_with('.') || value.ends_with('.'), "{value}")
                }
                other => panic!("{line:?} gave {other:?}"),
            }
        }
        assert_eq!(segment("20251212 0.5h\nA").unwrap()[0].hours, 0.5);
    }

    #[test]
    fn date_followed_by_text_is_content() {
        let blocks = segment("20251212 deployed").unwrap();
        assert!(blocks[0].date.is_none());
        assert_eq!(blocks[0].content, vec!["20251212 deployed"]);
    }
}
