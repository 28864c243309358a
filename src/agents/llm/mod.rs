//! Model provider clients
//!
//! A unified interface over text-generation providers:
//! - Anthropic (Claude)
//! - OpenAI (GPT)
//!
//! Clients perform no retries and no caching; one outbound call per
//! invocation, failures surfaced to the caller unchanged.

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agents::error::{LlmError, LlmResult};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the model)
    System,
    /// User message
    User,
    /// Assistant (model) message
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One (role, text) turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for text-generation providers
#[async_trait]
pub trait ModelClient: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Generate a response for a single prompt with an optional system prompt
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> LlmResult<String>;

    /// Generate a response for an ordered sequence of conversation turns
    async fn chat(&self, turns: &[Turn]) -> LlmResult<String>;
}

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Anthropic (Claude)
    #[default]
    #[serde(alias = "claude")]
    Anthropic,
    /// OpenAI (GPT)
    #[serde(alias = "gpt")]
    OpenAI,
}

impl ModelProvider {
    /// Infer the provider from a model identifier.
    ///
    /// `gpt-*` and `o*` model names belong to OpenAI; everything else is
    /// treated as Anthropic, which is also the default provider.
    pub fn for_model(model: &str) -> Self {
        let lower = model.to_ascii_lowercase();
        if lower.starts_with("gpt") || lower.starts_with("o1") || lower.starts_with("o3") {
            ModelProvider::OpenAI
        } else {
            ModelProvider::Anthropic
        }
    }
}

impl std::str::FromStr for ModelProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ModelProvider::Anthropic),
            "openai" | "gpt" => Ok(ModelProvider::OpenAI),
            other => Err(LlmError::UnknownProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::Anthropic => write!(f, "anthropic"),
            ModelProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Configuration for constructing a model client
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Provider to construct
    pub provider: ModelProvider,
    /// Model name/identifier
    pub model: String,
    /// API key, already resolved from the environment by the config layer
    pub api_key: Option<String>,
    /// Custom base URL (for proxied endpoints)
    pub base_url: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Create a model client from configuration.
///
/// Provider selection is a flat name-to-constructor mapping, resolved once
/// at startup; no runtime class hierarchy.
pub fn create_client(config: &ModelConfig) -> LlmResult<Arc<dyn ModelClient>> {
    match config.provider {
        ModelProvider::Anthropic => Ok(Arc::new(AnthropicClient::new(config)?)),
        ModelProvider::OpenAI => Ok(Arc::new(OpenAiClient::new(config)?)),
    }
}
