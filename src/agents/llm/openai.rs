//! OpenAI model client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ModelClient, ModelConfig, Role, Turn};
use crate::agents::error::{LlmError, LlmResult};

/// OpenAI (GPT) client
#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new OpenAI client from configuration.
    ///
    /// Fails fast when no API key is configured.
    pub fn new(config: &ModelConfig) -> LlmResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingCredential("OPENAI_API_KEY is not set".to_string()))?
            .to_string();

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn convert_turns(turns: &[Turn]) -> Vec<Value> {
        turns
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.to_string(),
                    "content": turn.content
                })
            })
            .collect()
    }

    async fn complete(&self, messages: Vec<Value>) -> LlmResult<String> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(0);
            return Err(LlmError::RateLimited { retry_after_ms });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("Response contained no choices".to_string()))
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String> {
        if prompt.is_empty() {
            return Err(LlmError::InvalidRequest("prompt must not be empty".to_string()));
        }

        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        self.complete(messages).await
    }

    async fn chat(&self, turns: &[Turn]) -> LlmResult<String> {
        if turns.iter().all(|t| t.role == Role::System) {
            return Err(LlmError::InvalidRequest(
                "chat requires at least one non-system turn".to_string(),
            ));
        }

        self.complete(Self::convert_turns(turns)).await
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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
