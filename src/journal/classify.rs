//! Keyword classification of log lines.
//!
//! [`KEYWORD_RULES`] is evaluated top to bottom and the first table with a
//! matching keyword decides the category. Operational and administrative
//! tables sit above research and service so that, for example, a meeting about
//! a PoC is filed under other affairs. Lines matching nothing are project work.

use super::types::Category;

/// Which keyword table a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTable {
    Temporary,
    Operations,
    Admin,
    Research,
    Service,
}

/// One ordered classification rule.
#[derive(Debug)]
pub struct KeywordRule {
    pub table: KeywordTable,
    pub category: Category,
    pub keywords: &'static [&'static str],
}

/// Classification rules in priority order.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        table: KeywordTable::Temporary,
        category: Category::OtherAffairs,
        keywords: &["临时工作"],
    },
    KeywordRule {
        table: KeywordTable::Operations,
        category: Category::OtherAffairs,
        keywords: &["运维", "权限", "工单", "服务器", "迁移", "配置", "公网访问"],
    },
    KeywordRule {
        table: KeywordTable::Admin,
        category: Category::OtherAffairs,
        keywords: &["会议", "沟通", "统计", "填报", "分享", "支持", "论文分享", "技术分享"],
    },
    KeywordRule {
        table: KeywordTable::Research,
        category: Category::Research,
        keywords: &["PoC", "调研"],
    },
    KeywordRule {
        table: KeywordTable::Service,
        category: Category::Service,
        keywords: &["服务化", "接口化"],
    },
];

/// Case-insensitive substring match, with an exact-case fallback for scripts
/// where lowercasing is not meaningful.
fn contains_keyword(line: &str, line_lower: &str, keyword: &str) -> bool {
    line_lower.contains(&keyword.to_lowercase()) || line.contains(keyword)
}

/// The rule that decides `line`'s category, if any.
pub fn matching_rule(line: &str) -> Option<&'static KeywordRule> {
    let lower = line.to_lowercase();
    KEYWORD_RULES.iter().find(|rule| {
        rule.keywords
            .iter()
            .any(|kw| contains_keyword(line, &lower, kw))
    })
}

/// Assign a line to exactly one category.
pub fn classify(line: &str) -> Category {
    matching_rule(line)
        .map(|rule| rule.category)
        .unwrap_or(Category::Project)
}
