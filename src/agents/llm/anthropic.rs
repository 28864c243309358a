//! Anthropic model client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ModelClient, ModelConfig, Role, Turn};
use crate::agents::error::{LlmError, LlmResult};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic (Claude) client
#[derive(Debug)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicClient {
    /// Create a new Anthropic client from configuration.
    ///
    /// Fails fast when no API key is configured.
    pub fn new(config: &ModelConfig) -> LlmResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                LlmError::MissingCredential("ANTHROPIC_API_KEY is not set".to_string())
            })?
            .to_string();

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com".to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Convert turns to Anthropic format.
    /// Returns (system_prompt, messages); system turns become the top-level
    /// `system` field rather than a message.
    fn convert_turns(turns: &[Turn]) -> (Option<String>, Vec<Value>) {
        let mut system_prompt = None;
        let mut messages = Vec::new();

        for turn in turns {
            match turn.role {
                Role::System => system_prompt = Some(turn.content.clone()),
                Role::User => messages.push(json!({
                    "role": "user",
                    "content": turn.content
                })),
                Role::Assistant => messages.push(json!({
                    "role": "assistant",
                    "content": turn.content
                })),
            }
        }

        (system_prompt, messages)
    }

    async fn complete(&self, system_prompt: Option<String>, messages: Vec<Value>) -> LlmResult<String> {
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": messages,
        });

        if let Some(system) = system_prompt {
            body["system"] = json!(system);
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited {
                retry_after_ms: retry_after_ms(response.headers()),
            });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        let mut content = String::new();
        for block in &parsed.content {
            if block.block_type == "text" {
                if let Some(text) = &block.text {
                    content.push_str(text);
                }
            }
        }

        Ok(content)
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        if prompt.is_empty() {
            return Err(LlmError::InvalidRequest("prompt must not be empty".to_string()));
        }

        let messages = vec![json!({ "role": "user", "content": prompt })];
        self.complete(system_prompt.map(String::from), messages).await
    }

    async fn chat(&self, turns: &[Turn]) -> LlmResult<String> {
        if turns.iter().all(|t| t.role == Role::System) {
            return Err(LlmError::InvalidRequest(
                "chat requires at least one non-system turn".to_string(),
            ));
        }

        let (system_prompt, messages) = Self::convert_turns(turns);
        self.complete(system_prompt, messages).await
    }
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(|secs| secs * 1000)
        .unwrap_or(0)
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
