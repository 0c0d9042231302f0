//! Typed errors for the parsing core and the LLM gateway.
//!
//! Everything above these layers (database, HTTP, CLI) works in `anyhow::Result`
//! and attaches context; these enums are what callers match on.

use thiserror::Error;

/// Failures of the daily-log parsing pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// A date-marker line carried an hour suffix that is not a positive number.
    #[error("invalid hours `{value}` on line {line}")]
    InvalidHours { line: usize, value: String },

    /// Input exceeds the configured character bound.
    #[error("input exceeds maximum length ({len} > {max} characters)")]
    InputTooLong { len: usize, max: usize },
}

/// Failures talking to the LLM gateway.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM api_url or api_key not configured")]
    NotConfigured,

    #[error("LLM request failed: {0}")]
    Transport(String),

    #[error("LLM returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("LLM call failed after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<LlmError>,
    },
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
