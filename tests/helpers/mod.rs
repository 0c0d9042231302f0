#![allow(dead_code)]

use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::atomic::{AtomicU32, Ordering};

use workpilot::db;
use workpilot::error::LlmError;
use workpilot::ledger::WorkItemDraft;
use workpilot::llm::LlmGateway;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A week of logs touching every category, with a duplicate across days.
pub const SAMPLE_LOG: &str = "20251208 8h
完成O类文档生产环境部署
修复登录问题

20251209 7.5h
修复登录问题
完成文档提取服务化改造
进行大模型PoC验证

20251210
参加项目会议
处理服务器迁移工单
临时工作：协助排查线上问题
";

/// Gateway that always fails, counting how often it was asked.
#[derive(Default)]
pub struct FailingGateway {
    pub calls: AtomicU32,
}

impl LlmGateway for FailingGateway {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::Exhausted {
            attempts: 3,
            source: Box::new(LlmError::Transport("connection refused".into())),
        })
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Gateway that returns the same text for every prompt.
pub struct FixedGateway {
    pub text: String,
}

impl FixedGateway {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl LlmGateway for FixedGateway {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
        Ok(self.text.clone())
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Build a work-item draft for `project` on `date` with the given skills.
pub fn draft(date: &str, project: Option<&str>, skills: &[&str]) -> WorkItemDraft {
    WorkItemDraft {
        raw_log_date: date.to_string(),
        project_name: project.map(str::to_string),
        action: Some("完成优化".to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}
