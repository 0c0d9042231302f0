//! LLM gateway.
//!
//! Generation talks to a chat-completions model through the [`LlmGateway`]
//! trait. [`http::HttpGateway`] calls a real OpenAI-compatible endpoint;
//! [`mock::MockGateway`] returns canned text for demos and for running without
//! credentials. Pick one with [`create_gateway`].

pub mod http;
pub mod mock;
pub mod prompts;

use std::time::Duration;

use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::error::LlmError;

/// A chat-completions model.
///
/// All methods are synchronous. Callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait LlmGateway: Send + Sync {
    /// Send one system + user exchange and return the model's reply text.
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Whether the gateway has what it needs to make a call.
    fn is_configured(&self) -> bool;

    /// Short label for logs and API responses.
    fn name(&self) -> &'static str;
}

/// Create a gateway from config.
///
/// Falls back to [`mock::MockGateway`] when `use_mock` is set or the endpoint
/// is not configured.
pub fn create_gateway(config: &LlmConfig, use_mock: bool) -> Box<dyn LlmGateway> {
    if use_mock || !config.is_configured() {
        info!(
            requested = use_mock,
            "using mock LLM gateway (LLM not configured or mock requested)"
        );
        return Box::new(mock::MockGateway::new());
    }
    Box::new(http::HttpGateway::new(config.clone()))
}

/// Run `op` up to `retries + 1` times.
///
/// `op` receives the zero-based attempt number. After failed attempt `k` the
/// caller sleeps `base_delay * 2^k` before trying again. When every attempt
/// fails the last error is returned inside [`LlmError::Exhausted`].
pub fn retry_with_backoff<T>(
    retries: u32,
    base_delay: Duration,
    mut op: impl FnMut(u32) -> Result<T, LlmError>,
) -> Result<T, LlmError> {
    let attempts = retries.saturating_add(1);
    let mut attempt = 0;

    loop {
        info!(attempt = attempt + 1, of = attempts, "LLM call attempt");
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 >= attempts => {
                warn!(attempt = attempt + 1, error = %e, "LLM call failed, giving up");
                return Err(LlmError::Exhausted {
                    attempts,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                let delay = backoff_delay(base_delay, attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "LLM call failed, retrying"
                );
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
        }
    }
}

/// `base * 2^attempt`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
