use std::time::Duration;

use engine_logging::{clip_for_log, engine_debug};
use serde::{Deserialize, Serialize};

use super::AgentError;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, name: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            role,
            name: name.map(ToOwned::to_owned),
            content: Some(content.into()),
        }
    }
}

/// Anything that turns a message list into the next assistant message.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    /// Returns the content of the first choice; `None` if the model sent none.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, AgentError>;
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: String,
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: String,
}

impl LlmConfig {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            endpoint: OPENAI_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible `chat/completions` client.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(config: LlmConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, AgentError> {
        engine_debug!(
            "LLM request model={} messages={}",
            self.config.model,
            messages.len()
        );
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Backend {
                status: status.as_u16(),
                body: clip_for_log(&body, 500),
            });
        }

        let body: CompletionResponse = response.json().await?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
