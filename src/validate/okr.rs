//! OKR structure check.
//!
//! Looks for objective labels (`目标 O1`), dated key-result nodes
//! (`2026-01-31前`), quantitative expressions, and KRs that carry at least two
//! dated nodes (intermediate + final milestone).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static OBJECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"目标\s*O\d+").expect("objective pattern is valid"));

static DATE_NODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}前").expect("date node pattern is valid"));

static KR_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"KR\d+[：:]").expect("kr label pattern is valid"));

/// A KR segment ends at the next `KR<n>` or objective label.
static KR_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"KR\d+|目标\s*O\d+").expect("kr boundary pattern is valid"));

/// Quantitative-expression patterns as `(id, regex)`.
pub const QUANTITATIVE_PATTERNS: &[(&str, &str)] = &[
    ("comparison", r"≥|>=|≤|<="),
    ("percentage", r"\d+%"),
    ("accuracy", "准确率"),
    ("coverage", "覆盖"),
    ("quantity", "数量"),
    ("launch", "上线"),
    ("acceptance", "验收"),
    ("performance", "性能"),
    ("availability", "可用性"),
];

static QUANTITATIVE: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    QUANTITATIVE_PATTERNS
        .iter()
        .map(|(id, pattern)| (*id, Regex::new(pattern).expect("quantitative pattern is valid")))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkrValidation {
    /// At least two objectives, one date node, and one quantitative expression.
    /// Looser than `objectives_valid`: four objectives still count as valid.
    pub valid: bool,
    pub objective_count: usize,
    /// Objective count is 2 or 3.
    pub objectives_valid: bool,
    pub date_nodes_count: usize,
    pub has_date_nodes: bool,
    /// Ids from [`QUANTITATIVE_PATTERNS`] that matched, in table order.
    pub quantitative_expressions: Vec<String>,
    pub has_quantitative: bool,
    pub has_milestones: bool,
}

/// Split the text into per-KR bodies: each runs from just after a `KR<n>：`
/// label to the next KR or objective label, or end of text.
pub fn kr_segments(text: &str) -> Vec<&str> {
    KR_LABEL
        .find_iter(text)
        .map(|label| {
            let end = KR_BOUNDARY
                .find_at(text, label.end())
                .map(|b| b.start())
                .unwrap_or(text.len());
            &text[label.end()..end]
        })
        .collect()
}

/// Check `okr` for objectives, dated nodes, quantitative terms, and milestones.
pub fn validate_okr(okr: &str) -> OkrValidation {
    let objective_count = OBJECTIVE.find_iter(okr).count();
    let date_nodes_count = DATE_NODE.find_iter(okr).count();

    let quantitative_expressions: Vec<String> = QUANTITATIVE
        .iter()
        .filter(|(_, re)| re.is_match(okr))
        .map(|(id, _)| id.to_string())
        .collect();

    let has_milestones = kr_segments(okr)
        .iter()
        .any(|segment| DATE_NODE.find_iter(segment).count() >= 2);

    let has_date_nodes = date_nodes_count > 0;
    let has_quantitative = !quantitative_expressions.is_empty();

    OkrValidation {
        valid: objective_count >= 2 && has_date_nodes && has_quantitative,
        objective_count,
        objectives_valid: (2..=3).contains(&objective_count),
        date_nodes_count,
        has_date_nodes,
        quantitative_expressions,
        has_quantitative,
        has_milestones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "2026第一季度OKR：

目标 O1：提升文档智能提取系统的准确率和稳定性
KR1：2026-01-31前完成根因分析，准确率回升至≥90%；2026-02-28前完成优化验证；2026-03-31前全类型平均准确率≥93%；
KR2：2026-02-15前完成监控告警体系搭建，覆盖100%核心接口；

目标 O2：推进服务化能力建设
KR1：2026-02-01前完成设计方案评审；2026-03-31前完成全量上线；";

    #[test]
    fn well_formed_okr() {
        let v = validate_okr(VALID);
        assert!(v.valid);
        assert_eq!(v.objective_count, 2);
        assert!(v.objectives_valid);
        assert_eq!(v.date_nodes_count, 6);
        assert!(v.has_date_nodes);
        assert!(v.has_quantitative);
        assert!(v.has_milestones);
        assert!(v.quantitative_expressions.contains(&"percentage".to_string()));
        assert!(v.quantitative_expressions.contains(&"comparison".to_string()));
    }

    #[test]
    fn minimal_okr_with_percentage() {
        let okr = "目标 O1：A\nKR1：2026-03-31前 提升 20%\n目标 O2：B\nKR1：完成迁移";
        let v = validate_okr(okr);
        assert!(v.objectives_valid);
        assert!(v.has_date_nodes);
        assert!(v.has_quantitative);
        assert_eq!(v.quantitative_expressions, vec!["percentage"]);
        assert!(!v.has_milestones);
        assert!(v.valid);
    }

    #[test]
    fn no_objectives() {
        let v = validate_okr("2026第一季度OKR：\nKR1：完成一些工作");
        assert_eq!(v.objective_count, 0);
        assert!(!v.objectives_valid);
        assert!(!v.valid);
    }

    #[test]
    fn four_objectives_still_valid_but_count_out_of_range() {
        let okr = "目标O1 目标O2 目标O3 目标O4\nKR1：2026-01-01前 上线";
        let v = validate_okr(okr);
        assert_eq!(v.objective_count, 4);
        assert!(!v.objectives_valid);
        assert!(v.valid);
    }

    #[test]
    fn date_without_particle_is_not_a_node() {
        let v = validate_okr("目标 O1 目标 O2 KR1：2026-01-31 完成 上线");
        assert_eq!(v.date_nodes_count, 0);
        assert!(!v.valid);
    }

    #[test]
    fn milestones_require_two_dates_in_one_kr() {
        let okr = "目标 O1\nKR1：2026-01-31前 A\nKR2：2026-02-28前 B";
        assert!(!validate_okr(okr).has_milestones);

        let okr = "目标 O1\nKR1：2026-01-31前 A，2026-02-28前 B\nKR2：C";
        assert!(validate_okr(okr).has_milestones);
    }

    #[test]
    fn kr_segments_stop_at_next_label() {
        let okr = "目标 O1\nKR1：alpha\nKR2:beta\n目标 O2\nKR1：gamma";
        let segments = kr_segments(okr);
        assert_eq!(segments, vec!["alpha\n", "beta\n", "gamma"]);
    }

    #[test]
    fn empty_text() {
        let v = validate_okr("");
        assert!(!v.valid);
        assert_eq!(v.objective_count, 0);
        assert!(v.quantitative_expressions.is_empty());
        assert!(!v.has_milestones);
    }
}
