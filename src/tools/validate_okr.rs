//! MCP `validate_okr` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `validate_okr` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ValidateOkrParams {
    #[schemars(description = "OKR text to check for objectives, dated key results, and quantitative targets")]
    pub okr: String,
}
