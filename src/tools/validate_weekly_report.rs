//! MCP `validate_weekly_report` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `validate_weekly_report` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ValidateWeeklyReportParams {
    #[schemars(description = "Weekly report text to check against the required section markers")]
    pub report: String,
}
