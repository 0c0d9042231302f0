//! Weekly-report and OKR generation.
//!
//! Both generators bound the input, build prompts, call the [`LlmGateway`], and
//! validate what comes back. When the gateway fails the generator degrades to
//! a deterministic rendering instead of returning an error, and the output
//! records which path produced the text.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ParseError;
use crate::journal::{check_input_len, parse, Category, ParseResult};
use crate::llm::{prompts, LlmGateway};
use crate::validate::{validate_okr, validate_report, OkrValidation, ReportValidation};

/// Which path produced the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Llm,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub report: String,
    pub validation: ReportValidation,
    pub parsed: ParseResult,
    pub source: GenerationSource,
    pub gateway: &'static str,
    /// Why the fallback was used, if it was.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOkr {
    pub okr: String,
    pub validation: OkrValidation,
    pub quarter: String,
    pub source: GenerationSource,
    pub gateway: &'static str,
    pub warning: Option<String>,
}

static LIST_NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+").expect("list numbering pattern is valid"));

/// Strip `N. ` list numbering from the start of each line.
///
/// Numbered lines are also left-trimmed. Section headers written as `N、` are
/// untouched.
pub fn clean_weekly_report_format(report: &str) -> String {
    report
        .split('\n')
        .map(|line| {
            let stripped = line.trim_start();
            if LIST_NUMBERING.is_match(stripped) {
                LIST_NUMBERING.replace(stripped, "").into_owned()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate a weekly report from a raw daily log.
///
/// Fails only on input errors (too long, malformed hours). Gateway failures
/// fall back to [`fallback_weekly_report`].
pub fn generate_weekly_report(
    content: &str,
    today: NaiveDate,
    gateway: &dyn LlmGateway,
    max_chars: usize,
) -> Result<GeneratedReport, ParseError> {
    check_input_len(content, max_chars)?;
    let parsed = parse(content, today)?;

    let system = prompts::weekly_report_system();
    let user = prompts::weekly_report_user(&parsed.week_range, content);

    let (report, source, warning) = match gateway.complete(&system, &user) {
        Ok(raw) => (clean_weekly_report_format(&raw), GenerationSource::Llm, None),
        Err(e) => {
            warn!(error = %e, gateway = gateway.name(), "weekly report generation fell back");
            (
                fallback_weekly_report(&parsed),
                GenerationSource::Fallback,
                Some(e.to_string()),
            )
        }
    };

    let validation = validate_report(&report);
    info!(
        source = ?source,
        valid = validation.valid,
        missing = validation.missing_sections.len(),
        "weekly report generated"
    );

    Ok(GeneratedReport {
        report,
        validation,
        parsed,
        source,
        gateway: gateway.name(),
        warning,
    })
}

fn bullet_list(out: &mut String, entries: &[String]) {
    for entry in entries {
        out.push_str("- ");
        out.push_str(entry);
        out.push('\n');
    }
}

/// Render a report straight from the categorised entries.
///
/// Emits every required section marker in template order.
pub fn fallback_weekly_report(parsed: &ParseResult) -> String {
    let week = &parsed.week_range;
    let total: usize = parsed.categories.values().map(Vec::len).sum();

    let mut out = format!(
        "周报（{} ~ {}）\n\n",
        week.start.format("%Y-%m-%d"),
        week.end.format("%Y-%m-%d")
    );
    // Subsection headings must not appear before section 1.
    out.push_str(&format!(
        "本周一句话总结：本周共记录{total}项工作，累计{}小时（项目{}项，服务化{}项，调研{}项，事务{}项）；暂无显著风险。\n\n",
        parsed.total_hours(),
        parsed.entries(Category::Project).len(),
        parsed.entries(Category::Service).len(),
        parsed.entries(Category::Research).len(),
        parsed.entries(Category::OtherAffairs).len(),
    ));

    out.push_str("1、手上项目、服务化能力建设、预研的主要进展\n\n");
    for category in [Category::Project, Category::Service, Category::Research] {
        out.push_str(category.report_heading());
        out.push('\n');
        bullet_list(&mut out, parsed.entries(category));
        out.push('\n');
    }

    out.push_str("2、是否有风险，哪些风险点？\n- 暂无显著风险\n\n");

    out.push_str("3、");
    out.push_str(Category::OtherAffairs.report_heading());
    out.push('\n');
    bullet_list(&mut out, parsed.entries(Category::OtherAffairs));
    out.push('\n');

    out.push_str("4、下周大概的计划\n");
    let carried: Vec<String> = [Category::Project, Category::Service, Category::Research]
        .iter()
        .flat_map(|c| parsed.entries(*c))
        .take(3)
        .map(|e| format!("继续推进：{e}"))
        .collect();
    if carried.is_empty() {
        out.push_str("- 按计划推进本周未完成事项\n");
    } else {
        bullet_list(&mut out, &carried);
    }

    out
}

/// Generate next quarter's OKR from historical material.
pub fn generate_okr(
    content: &str,
    quarter: &str,
    today: NaiveDate,
    gateway: &dyn LlmGateway,
    max_chars: usize,
) -> Result<GeneratedOkr, ParseError> {
    check_input_len(content, max_chars)?;

    let system = prompts::okr_system();
    let user = prompts::okr_user(content, quarter);

    let (okr, source, warning) = match gateway.complete(&system, &user) {
        Ok(okr) => (okr, GenerationSource::Llm, None),
        Err(e) => {
            warn!(error = %e, gateway = gateway.name(), "OKR generation fell back");
            (
                fallback_okr(quarter, today),
                GenerationSource::Fallback,
                Some(e.to_string()),
            )
        }
    };

    let validation = validate_okr(&okr);
    info!(source = ?source, valid = validation.valid, quarter, "OKR generated");

    Ok(GeneratedOkr {
        okr,
        validation,
        quarter: quarter.to_string(),
        source,
        gateway: gateway.name(),
        warning,
    })
}

/// A calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter {
    pub year: i32,
    /// 1 through 4.
    pub number: u32,
}

impl Quarter {
    /// The quarter after the one containing `today`.
    pub fn following(today: NaiveDate) -> Self {
        let current = (today.month0() / 3) + 1;
        if current == 4 {
            Self { year: today.year() + 1, number: 1 }
        } else {
            Self { year: today.year(), number: current + 1 }
        }
    }

    /// Last day of each of the quarter's three months.
    pub fn month_ends(&self) -> [NaiveDate; 3] {
        let first_month = (self.number - 1) * 3 + 1;
        [0, 1, 2].map(|offset| month_end(self.year, first_month + offset))
    }

    /// Label in the form `2026第一季度`.
    pub fn label(&self) -> String {
        let numeral = ["一", "二", "三", "四"][(self.number - 1) as usize];
        format!("{}第{numeral}季度", self.year)
    }
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MIN)
}

static QUARTER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s*年?\s*(?:第\s*([一二三四1-4])\s*季度|[Qq]([1-4]))")
        .expect("quarter label pattern is valid")
});

/// Parse labels like `2026第一季度`, `2026年第2季度`, or `2026Q3`.
pub fn parse_quarter(label: &str) -> Option<Quarter> {
    let caps = QUARTER_LABEL.captures(label)?;
    let year = caps[1].parse().ok()?;
    let number = match caps.get(2).or(caps.get(3))?.as_str() {
        "一" | "1" => 1,
        "二" | "2" => 2,
        "三" | "3" => 3,
        "四" | "4" => 4,
        _ => return None,
    };
    Some(Quarter { year, number })
}

/// Month ends of the labelled quarter, or of the quarter after `today` when
/// the label does not parse.
pub fn quarter_months(label: &str, today: NaiveDate) -> [NaiveDate; 3] {
    parse_quarter(label)
        .unwrap_or_else(|| Quarter::following(today))
        .month_ends()
}

/// Two objectives with dated, quantified KRs and a three-step milestone KR.
pub fn fallback_okr(quarter: &str, today: NaiveDate) -> String {
    let [m1, m2, m3] = quarter_months(quarter, today).map(|d| d.format("%Y-%m-%d").to_string());

    format!(
        "{quarter}OKR：

目标 O1：保障在手项目按期交付并提升质量
KR1：{m1}前完成在手项目遗留问题梳理与根因分析，覆盖100%已知问题；{m2}前完成优化验证；{m3}前核心指标达成率≥90%；
KR2：{m3}前完成项目文档与交付物验收，验收通过率100%；

目标 O2：推进服务化能力建设与团队效率提升
KR1：{m1}前完成服务化改造方案评审；{m2}前完成核心模块接口化开发，覆盖≥80%功能；{m3}前完成全量上线；
KR2：{m3}前完成技术分享不少于2次，沉淀文档数量≥2篇；"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strips_list_numbering_only() {
        let raw = "1. 完成部署\n  2. 修复问题\n1、手上项目、服务化能力建设、预研的主要进展\n2026.01 版本\n- 条目";
        let cleaned = clean_weekly_report_format(raw);
        assert_eq!(
            cleaned,
            "完成部署\n修复问题\n1、手上项目、服务化能力建设、预研的主要进展\n2026.01 版本\n- 条目"
        );
    }

    #[test]
    fn parses_quarter_labels() {
        assert_eq!(parse_quarter("2026第一季度"), Some(Quarter { year: 2026, number: 1 }));
        assert_eq!(parse_quarter("2026年第3季度"), Some(Quarter { year: 2026, number: 3 }));
        assert_eq!(parse_quarter("2027Q4"), Some(Quarter { year: 2027, number: 4 }));
        assert_eq!(parse_quarter("next quarter"), None);
    }

    #[test]
    fn month_ends_handle_february_and_december() {
        assert_eq!(
            Quarter { year: 2028, number: 1 }.month_ends(),
            [date(2028, 1, 31), date(2028, 2, 29), date(2028, 3, 31)]
        );
        assert_eq!(
            Quarter { year: 2026, number: 4 }.month_ends()[2],
            date(2026, 12, 31)
        );
    }

    #[test]
    fn unparseable_quarter_uses_following_quarter() {
        let months = quarter_months("下个季度", date(2026, 11, 3));
        assert_eq!(months[0], date(2027, 1, 31));
        assert_eq!(Quarter::following(date(2026, 5, 1)).label(), "2026第三季度");
    }

    #[test]
    fn fallback_report_keeps_marker_order() {
        let parsed = parse("20251212 8h\n完成部署\n修复问题\n参加会议", date(2025, 12, 12)).unwrap();
        let report = fallback_weekly_report(&parsed);
        let v = validate_report(&report);
        assert!(v.valid, "{v:?}");
        assert!(report.contains("本周共记录3项工作，累计8小时"));
        assert!(report.contains("- 继续推进：完成部署"));
        assert!(report.contains("3、其他的事务性工作\n- 参加会议"));
    }

    #[test]
    fn fallback_okr_is_valid_with_milestones() {
        let okr = fallback_okr("2026第二季度", date(2026, 3, 1));
        assert!(okr.starts_with("2026第二季度OKR："));
        assert!(okr.contains("2026-04-30前"));
        assert!(okr.contains("2026-06-30前"));
        let v = validate_okr(&okr);
        assert!(v.valid);
        assert!(v.objectives_valid);
        assert!(v.has_milestones);
    }
}
