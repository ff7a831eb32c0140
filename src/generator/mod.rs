//! External roadmap text generator
//!
//! The generator is a chat-completions style endpoint: a bearer credential, a
//! model id and a single system-role message go out, and free-form text
//! comes back in `choices[0].message.content`.

use crate::config::GeneratorConfig;
use crate::providers::build_http_client;
use crate::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces free-form text for a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// [`TextGenerator`] backed by a chat-completions HTTP endpoint
pub struct ChatCompletionsGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl ChatCompletionsGenerator {
    pub fn new(client: Client, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(client, config.clone()))
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Text generator request failed");
                GenerationError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Text generator returned an error status");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: ChatResponseRaw =
            serde_json::from_str(&body).map_err(|e| GenerationError::Parse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(GenerationError::Api(describe_error(&error)));
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        tracing::debug!(
            model = %self.config.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "Roadmap text generated"
        );

        Ok(content)
    }
}

/// Pulls a readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ChatResponseRaw>(body)
        .ok()
        .and_then(|raw| raw.error)
        .map(|error| describe_error(&error))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Error envelopes are either a string or an object with a `message`
fn describe_error(error: &serde_json::Value) -> String {
    error
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
