//! MCP `generate_weekly_report` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `generate_weekly_report` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GenerateWeeklyReportParams {
    /// Raw daily log text for the week.
    #[schemars(description = "Daily log text for the week")]
    pub content: String,
    /// Use the canned mock model instead of the configured endpoint.
    #[schemars(description = "Use the built-in mock model (default: false)")]
    pub use_mock: Option<bool>,
}
