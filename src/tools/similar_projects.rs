//! MCP `similar_projects` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `similar_projects` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SimilarProjectsParams {
    #[schemars(description = "Minimum name similarity in [0, 1] (default: configured threshold, 0.6)")]
    pub threshold: Option<f64>,
}
