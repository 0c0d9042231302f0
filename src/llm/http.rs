//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{retry_with_backoff, LlmGateway};
use crate::config::LlmConfig;
use crate::error::LlmError;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Calls `POST {api_url}/chat/completions` with bearer auth, retrying with
/// exponential backoff.
pub struct HttpGateway {
    config: LlmConfig,
}

impl HttpGateway {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }

    fn request_once(
        &self,
        client: &reqwest::blocking::Client,
        body: &ChatRequest<'_>,
    ) -> Result<String, LlmError> {
        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        extract_content(&text)
    }
}

impl LlmGateway for HttpGateway {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::NotConfigured);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let content = retry_with_backoff(
            self.config.retry,
            Duration::from_millis(self.config.backoff_base_ms),
            |_| self.request_once(&client, &body),
        )?;
        info!(chars = content.chars().count(), model = %self.config.model, "LLM call succeeded");
        Ok(content)
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Pull the reply out of a chat-completions response body.
///
/// Reads `choices[0].message.content`, then `choices[0].text`. No choices
/// yields an empty string.
pub fn extract_content(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    let Some(choice) = response.choices.into_iter().next() else {
        return Ok(String::new());
    };

    let content = choice
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .or(choice.text)
        .unwrap_or_default();
    Ok(content)
}
