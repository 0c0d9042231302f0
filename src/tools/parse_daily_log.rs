//! MCP `parse_daily_log` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `parse_daily_log` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ParseDailyLogParams {
    /// Raw daily log text.
    #[schemars(description = "Daily log text. Date lines like 20251208 or 2025-12-08 8h start a new day.")]
    pub content: String,
}
