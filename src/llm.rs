//! Message generator: a single chat-completion round trip.
//!
//! No retries and no streaming; any failure is returned to the caller
//! as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::Config;
use crate::log_debug;

/// Default endpoint for chat completions
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the message generator
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("empty diff provided")]
    EmptyInput,
    #[error("no API key configured. Please set your API key.")]
    MissingApiKey,
    #[error("failed to generate commit message: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no response from the completion service")]
    EmptyChoices,
    #[error("no staged files to describe")]
    NoStagedFiles,
    #[error("no commit message could be generated for any staged file")]
    NothingGenerated,
    #[error("failed to read staged changes: {0}")]
    Diff(String),
}

/// Per-request model settings taken from the configuration
#[derive(Clone, PartialEq)]
pub struct ModelSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl ModelSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("api_key", &crate::ui::mask_api_key(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Produces text from a system prompt and user text
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn complete(
        &self,
        settings: &ModelSettings,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: Client,
    api_base: String,
}

impl OpenAiClient {
    pub fn new() -> Result<Self, GenerationError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_base_url(api_base: &str) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MessageGenerator for OpenAiClient {
    async fn complete(
        &self,
        settings: &ModelSettings,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerationError> {
        if user_text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        if settings.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        log_debug!(
            "Requesting completion from {} with model {} ({} bytes of input)",
            self.api_base,
            settings.model,
            user_text.len()
        );

        let body = ChatRequest {
            model: &settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: settings.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&settings.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyChoices)?;

        log_debug!("Received completion ({} bytes)", content.len());
        Ok(content)
    }
}
