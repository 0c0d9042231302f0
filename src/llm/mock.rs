//! Deterministic stand-in for a real model.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::prompts::{OKR_ROLE, WEEKLY_REPORT_ROLE};
use super::LlmGateway;
use crate::error::LlmError;
use crate::journal::{current_week_range, WeekRange};

static WEEK_IN_PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"周范围：(\d{4}-\d{2}-\d{2}) ~ (\d{4}-\d{2}-\d{2})").expect("week pattern is valid")
});

/// Returns canned weekly reports and OKRs.
///
/// Requests are recognised by the role tag in the system prompt, then by
/// keywords in the user prompt. The weekly report's title range is taken from
/// the user prompt when present, otherwise the current week.
#[derive(Debug, Default)]
pub struct MockGateway;

impl MockGateway {
    pub fn new() -> Self {
        Self
    }
}

impl LlmGateway for MockGateway {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if system.contains(OKR_ROLE) {
            return Ok(mock_okr());
        }
        if system.contains(WEEKLY_REPORT_ROLE) || user.contains("周报") {
            return Ok(mock_weekly_report(&week_from_prompt(user)));
        }
        if user.to_lowercase().contains("okr") {
            return Ok(mock_okr());
        }
        Ok("Mock response: 收到您的请求，这是模拟响应。".into())
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn week_from_prompt(user: &str) -> WeekRange {
    WEEK_IN_PROMPT
        .captures(user)
        .and_then(|caps| {
            let start = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
            let end = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d").ok()?;
            Some(WeekRange { start, end })
        })
        .unwrap_or_else(|| current_week_range(Local::now().date_naive()))
}

fn mock_weekly_report(week: &WeekRange) -> String {
    format!(
        "周报（{} ~ {}）

本周一句话总结：本周完成了O类文档生产环境部署和服务器迁移配置工作，需关注I_C-I_E类文档准确率下降问题。

1、手上项目、服务化能力建设、预研的主要进展

手上项目
- 完成O类文档生产环境部署与联调，修复若干提取问题
- 根据业务方准确率报告，排查I_C-I_E类文档准确率下降原因

服务化能力建设

预研

2、是否有风险，哪些风险点？
- 资源紧张：准确率修复与新功能并行开发，建议优先级排序并集中资源
- I_C-I_E准确率下降原因未明确，需进一步定位根因

3、其他的事务性工作
- 完成17服务器迁移，配置nexus私服与rsync同步
- 完成服务器公网访问工单申请

4、下周大概的计划
- 继续排查并修复I_C-I_E准确率问题
- 监控O类生产环境运行稳定性
- 完善服务器配置与运维文档",
        week.start.format("%Y-%m-%d"),
        week.end.format("%Y-%m-%d"),
    )
}

fn mock_okr() -> String {
    "2026第一季度OKR：

目标 O1：提升文档智能提取系统的准确率和稳定性
KR1：2026-01-31前完成I_C-I_E类文档准确率问题根因分析，准确率回升至≥90%；2026-02-28前完成优化验证，准确率稳定在≥92%；2026-03-31前全类型文档平均准确率≥93%；
KR2：2026-02-15前完成生产环境监控告警体系搭建，覆盖100%核心接口；2026-03-31前系统可用性≥99.5%；
KR3：2026-01-15前完成性能基准测试，2026-02-28前优化响应时间≤2秒（P95）；

目标 O2：推进服务化能力建设与基础设施优化
KR1：2026-02-01前完成服务接口化改造设计方案评审；2026-02-28前完成核心模块接口化开发，覆盖≥80%功能；2026-03-31前完成全量上线与文档交付；
KR2：2026-01-20前完成服务器环境标准化配置，覆盖100%生产节点；2026-03-15前完成自动化部署流程，部署时间缩短≥50%；"
        .into()
}
