//! Weekly-report structure check.
//!
//! The report template is a fixed sequence of literal markers. A report is
//! valid when every marker is present and the markers that are present appear
//! in non-decreasing order of first occurrence.

use serde::{Deserialize, Serialize};

/// Where a marker sits in the report outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTier {
    Title,
    Summary,
    Section,
    Subsection,
}

#[derive(Debug)]
pub struct SectionMarker {
    pub marker: &'static str,
    pub tier: SectionTier,
}

/// Required markers, in template order.
pub const REQUIRED_SECTIONS: &[SectionMarker] = &[
    SectionMarker { marker: "周报（", tier: SectionTier::Title },
    SectionMarker { marker: "本周一句话总结：", tier: SectionTier::Summary },
    SectionMarker { marker: "1、手上项目、服务化能力建设、预研的主要进展", tier: SectionTier::Section },
    SectionMarker { marker: "手上项目", tier: SectionTier::Subsection },
    SectionMarker { marker: "服务化能力建设", tier: SectionTier::Subsection },
    SectionMarker { marker: "预研", tier: SectionTier::Subsection },
    SectionMarker { marker: "2、是否有风险，哪些风险点？", tier: SectionTier::Section },
    SectionMarker { marker: "3、其他的事务性工作", tier: SectionTier::Section },
    SectionMarker { marker: "4、下周大概的计划", tier: SectionTier::Section },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportValidation {
    pub valid: bool,
    pub missing_sections: Vec<String>,
    pub order_valid: bool,
}

/// Check `report` against [`REQUIRED_SECTIONS`].
pub fn validate_report(report: &str) -> ReportValidation {
    let positions: Vec<(&SectionMarker, Option<usize>)> = REQUIRED_SECTIONS
        .iter()
        .map(|s| (s, report.find(s.marker)))
        .collect();

    let missing_sections: Vec<String> = positions
        .iter()
        .filter(|(_, pos)| pos.is_none())
        .map(|(s, _)| s.marker.to_string())
        .collect();

    let found: Vec<usize> = positions.iter().filter_map(|(_, pos)| *pos).collect();
    let order_valid = found.windows(2).all(|w| w[0] <= w[1]);

    ReportValidation {
        valid: missing_sections.is_empty() && order_valid,
        missing_sections,
        order_valid,
    }
}
