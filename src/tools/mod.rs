pub mod generate_weekly_report;
pub mod parse_daily_log;
pub mod similar_projects;
pub mod validate_okr;
pub mod validate_weekly_report;

use generate_weekly_report::GenerateWeeklyReportParams;
use parse_daily_log::ParseDailyLogParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use similar_projects::SimilarProjectsParams;
use std::sync::{Arc, Mutex};
use validate_okr::ValidateOkrParams;
use validate_weekly_report::ValidateWeeklyReportParams;

use crate::config::WorkPilotConfig;

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}

/// The WorkPilot MCP tool handler. Holds shared state (db connection, config)
/// and exposes the parse, validate, and generate operations as MCP tools.
#[derive(Clone)]
pub struct WorkPilotTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    config: Arc<WorkPilotConfig>,
}

#[tool_router]
impl WorkPilotTools {
    pub fn new(db: Arc<Mutex<Connection>>, config: Arc<WorkPilotConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            config,
        }
    }

    /// Split a daily log into dated blocks and categorised, deduplicated entries.
    #[tool(description = "Parse a daily work log. Returns per-day blocks with hours, entries grouped into project / service / research / other_affairs, and the current Monday-Friday week.")]
    async fn parse_daily_log(
        &self,
        Parameters(params): Parameters<ParseDailyLogParams>,
    ) -> Result<String, String> {
        let max = self.config.report.max_input_chars;
        crate::journal::check_input_len(&params.content, max).map_err(|e| e.to_string())?;
        let result = crate::journal::parse(&params.content, today()).map_err(|e| e.to_string())?;

        tracing::info!(blocks = result.blocks.len(), "parse_daily_log called");
        to_json(&result)
    }

    /// Check a weekly report for the required section markers and their order.
    #[tool(description = "Validate a weekly report: lists missing section markers and whether the present ones are in template order.")]
    async fn validate_weekly_report(
        &self,
        Parameters(params): Parameters<ValidateWeeklyReportParams>,
    ) -> Result<String, String> {
        let validation = crate::validate::validate_report(&params.report);
        tracing::info!(valid = validation.valid, "validate_weekly_report called");
        to_json(&validation)
    }

    /// Check an OKR for objectives, dated KRs, quantitative targets, and milestones.
    #[tool(description = "Validate an OKR: counts objectives (目标 O1...) and dated nodes (YYYY-MM-DD前), lists quantitative expressions, and detects multi-milestone KRs.")]
    async fn validate_okr(
        &self,
        Parameters(params): Parameters<ValidateOkrParams>,
    ) -> Result<String, String> {
        let validation = crate::validate::validate_okr(&params.okr);
        tracing::info!(valid = validation.valid, objectives = validation.objective_count, "validate_okr called");
        to_json(&validation)
    }

    /// Generate a weekly report from a daily log through the configured model.
    #[tool(description = "Generate a weekly report from a daily log. Falls back to a deterministic rendering when the model is unavailable; the result says which was used.")]
    async fn generate_weekly_report(
        &self,
        Parameters(params): Parameters<GenerateWeeklyReportParams>,
    ) -> Result<String, String> {
        let config = Arc::clone(&self.config);
        let use_mock = params.use_mock.unwrap_or(false);
        let content = params.content;

        // LLM calls block → spawn_blocking
        let generated = tokio::task::spawn_blocking(move || {
            let gateway = crate::llm::create_gateway(&config.llm, use_mock);
            crate::generate::generate_weekly_report(
                &content,
                today(),
                gateway.as_ref(),
                config.report.max_input_chars,
            )
        })
        .await
        .map_err(|e| format!("generation task failed: {e}"))?
        .map_err(|e| e.to_string())?;

        tracing::info!(
            source = ?generated.source,
            valid = generated.validation.valid,
            "generate_weekly_report called"
        );
        to_json(&generated)
    }

    /// List groups of projects whose names look like duplicates.
    #[tool(description = "Find groups of similarly named projects in the ledger, each with a recommended merge target (the shortest name).")]
    async fn similar_projects(
        &self,
        Parameters(params): Parameters<SimilarProjectsParams>,
    ) -> Result<String, String> {
        let threshold = params
            .threshold
            .unwrap_or(self.config.report.similarity_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err("threshold must be between 0.0 and 1.0".into());
        }

        let db = Arc::clone(&self.db);
        let groups = tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            crate::ledger::find_similar_project_groups(&conn, threshold)
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))?
        .map_err(|e| format!("lookup failed: {e}"))?;

        tracing::info!(groups = groups.len(), threshold, "similar_projects called");
        to_json(&groups)
    }
}

#[tool_handler]
impl ServerHandler for WorkPilotTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "WorkPilot turns daily work logs into weekly reports. Use parse_daily_log to \
                 preview categorisation, generate_weekly_report to draft a report, and the \
                 validate_* tools to check generated text."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
