//! Full parse: segment → classify → deduplicate, plus the current-week range.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use super::classify::classify;
use super::dedup::deduplicate;
use super::segment::segment;
use super::types::{Category, ParseResult, WeekRange};
use crate::error::ParseError;

/// Monday through Friday of the week containing `today`.
pub fn current_week_range(today: NaiveDate) -> WeekRange {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    WeekRange {
        start: monday,
        end: monday + Duration::days(4),
    }
}

/// Reject input longer than `max_chars` Unicode scalar values.
pub fn check_input_len(text: &str, max_chars: usize) -> Result<(), ParseError> {
    let len = text.chars().count();
    if len > max_chars {
        return Err(ParseError::InputTooLong {
            len,
            max: max_chars,
        });
    }
    Ok(())
}

/// Group every content line of every block by category, in source order.
pub fn categorize<'a>(lines: impl IntoIterator<Item = &'a str>) -> BTreeMap<Category, Vec<String>> {
    let mut categories: BTreeMap<Category, Vec<String>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();

    for line in lines {
        categories
            .entry(classify(line))
            .or_default()
            .push(line.to_string());
    }
    categories
}

/// Parse a raw daily log. Pure: depends only on `text` and `today`.
pub fn parse(text: &str, today: NaiveDate) -> Result<ParseResult, ParseError> {
    let blocks = segment(text)?;

    let raw = categorize(
        blocks
            .iter()
            .flat_map(|b| b.content.iter().map(String::as_str)),
    );
    let categories = raw
        .into_iter()
        .map(|(category, lines)| (category, deduplicate(&lines)))
        .collect();

    let result = ParseResult {
        blocks,
        categories,
        week_range: current_week_range(today),
    };

    tracing::debug!(
        blocks = result.blocks.len(),
        project = result.entries(Category::Project).len(),
        service = result.entries(Category::Service).len(),
        research = result.entries(Category::Research).len(),
        other_affairs = result.entries(Category::OtherAffairs).len(),
        "parsed daily log"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_range_from_midweek() {
        let range = current_week_range(date("2025-12-10")); // Wednesday
        assert_eq!(range.start, date("2025-12-08"));
        assert_eq!(range.end, date("2025-12-12"));
    }

    #[test]
    fn week_range_from_sunday_looks_back() {
        let range = current_week_range(date("2025-12-14"));
        assert_eq!(range.start.weekday(), Weekday::Mon);
        assert_eq!(range.end.weekday(), Weekday::Fri);
        assert_eq!(range.start, date("2025-12-08"));
    }

    #[test]
    fn week_range_on_monday_starts_today() {
        let range = current_week_range(date("2025-12-08"));
        assert_eq!(range.start, date("2025-12-08"));
    }

    #[test]
    fn input_bound_counts_chars_not_bytes() {
        let text = "周".repeat(10);
        assert!(check_input_len(&text, 10).is_ok());
        assert_eq!(
            check_input_len(&text, 9),
            Err(ParseError::InputTooLong { len: 10, max: 9 })
        );
    }

    #[test]
    fn parse_fills_all_categories() {
        let text = "20251211 8h\n完成O类文档生产环境部署\n进行技术调研\n\n20251212 8h\n临时工作：处理紧急问题\n完成服务化改造\n参加项目会议";
        let result = parse(text, date("2025-12-12")).unwrap();

        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.categories.len(), 4);
        assert_eq!(result.entries(Category::Project), ["完成O类文档生产环境部署"]);
        assert_eq!(result.entries(Category::Research), ["进行技术调研"]);
        assert_eq!(result.entries(Category::Service), ["完成服务化改造"]);
        assert_eq!(result.entries(Category::OtherAffairs).len(), 2);
        assert_eq!(result.total_hours(), 16.0);
    }

    #[test]
    fn parse_deduplicates_across_days() {
        let text = "20251211\n修复登录问题\n20251212\n修复登录问题\n修复登录问题并补充测试";
        let result = parse(text, date("2025-12-12")).unwrap();
        assert_eq!(result.entries(Category::Project), ["修复登录问题"]);
        // blocks keep the raw lines
        assert_eq!(result.blocks[1].content.len(), 2);
    }

    #[test]
    fn parse_is_repeatable() {
        let text = "20251211 7.5h\nA\nB\n20251212\nA";
        let today = date("2025-12-12");
        assert_eq!(parse(text, today).unwrap(), parse(text, today).unwrap());
    }

    #[test]
    fn parse_empty_text() {
        let result = parse("", date("2025-12-12")).unwrap();
        assert!(result.blocks.is_empty());
        assert!(result.categories.values().all(Vec::is_empty));
    }
}
