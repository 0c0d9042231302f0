mod helpers;

use workpilot::error::ParseError;
use workpilot::journal::{self, Category};

#[test]
fn sample_week_is_categorised() {
    let result = journal::parse(helpers::SAMPLE_LOG, helpers::date("2025-12-10")).unwrap();

    assert_eq!(result.blocks.len(), 3);
    assert_eq!(result.blocks[0].date.as_deref(), Some("2025-12-08"));
    assert_eq!(result.blocks[1].hours, 7.5);
    assert_eq!(result.blocks[2].hours, 8.0);
    assert_eq!(result.total_hours(), 23.5);

    assert_eq!(
        result.entries(Category::Project),
        ["完成O类文档生产环境部署", "修复登录问题"]
    );
    assert_eq!(result.entries(Category::Service), ["完成文档提取服务化改造"]);
    assert_eq!(result.entries(Category::Research), ["进行大模型PoC验证"]);
    assert_eq!(result.entries(Category::OtherAffairs).len(), 3);

    assert_eq!(result.week_range.start, helpers::date("2025-12-08"));
    assert_eq!(result.week_range.end, helpers::date("2025-12-12"));
}

#[test]
fn lines_before_first_marker_form_undated_block() {
    let text = "随手记一笔\n20251212\n正式内容";
    let result = journal::parse(text, helpers::date("2025-12-12")).unwrap();

    assert_eq!(result.blocks.len(), 2);
    assert!(result.blocks[0].date.is_none());
    assert_eq!(result.blocks[0].content, ["随手记一笔"]);
    assert_eq!(result.blocks[1].date.as_deref(), Some("2025-12-12"));
}

#[test]
fn dashed_dates_and_hour_variants() {
    let text = "2025-12-11 6 h\nA\n2025-12-12 7.5H\nB";
    let blocks = journal::segment(text).unwrap();
    assert_eq!(blocks[0].hours, 6.0);
    assert_eq!(blocks[1].hours, 7.5);
    assert_eq!(blocks[1].date.as_deref(), Some("2025-12-12"));
}

#[test]
fn zero_hours_fail_with_line_number() {
    let text = "20251211 8h\nA\n20251212 0h\nB";
    let err = journal::parse(text, helpers::date("2025-12-12")).unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidHours {
            line: 3,
            value: "0".into()
        }
    );
}

#[test]
fn trailing_decimal_point_in_hours_fails() {
    let text = "20251211 8h\nA\n20251212 8.h\nB";
    let err = journal::parse(text, helpers::date("2025-12-12")).unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidHours {
            line: 3,
            value: "8.".into()
        }
    );
}

#[test]
fn classification_priority_puts_meetings_above_research() {
    assert_eq!(journal::classify("PoC方案评审会议"), Category::OtherAffairs);
    assert_eq!(journal::classify("接口化PoC"), Category::Research);
    assert_eq!(journal::classify("服务化改造"), Category::Service);
    assert_eq!(journal::classify("poc 环境搭建"), Category::Research);
    assert_eq!(journal::classify("完成需求开发"), Category::Project);
}

#[test]
fn every_category_is_present_even_when_empty() {
    let result = journal::parse("", helpers::date("2025-12-12")).unwrap();
    assert!(result.blocks.is_empty());
    for category in Category::ALL {
        assert!(result.categories.contains_key(&category));
        assert!(result.entries(category).is_empty());
    }
}

#[test]
fn parse_result_serializes_with_snake_case_keys() {
    let result = journal::parse(helpers::SAMPLE_LOG, helpers::date("2025-12-10")).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["categories"]["other_affairs"].is_array());
    assert_eq!(json["week_range"]["start"], "2025-12-08");
}
