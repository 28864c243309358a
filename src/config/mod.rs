//! Configuration management
//!
//! Settings are read from the environment (the deployment contract) layered
//! over an optional `mentor.toml` file. The core consumes these values; it
//! does not own them.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::agents::llm::{ModelConfig, ModelProvider};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Server bind host
    #[serde(default = "default_host")]
    pub server_host: String,
    /// Server bind port
    #[serde(default = "default_port")]
    pub server_port: u16,
    /// GitHub access token
    #[serde(default)]
    pub github_token: Option<String>,
    /// Anthropic API key
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Default model identifier; also selects the provider
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model() -> String {
    "claude-3-sonnet-20240229".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_host: default_host(),
            server_port: default_port(),
            github_token: None,
            anthropic_api_key: None,
            openai_api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Settings {
    /// Load settings from `mentor.toml` (when present) and the environment.
    /// Environment variables win over file values.
    pub fn new() -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::with_name("mentor").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// API key for a provider, when configured
    pub fn api_key(&self, provider: ModelProvider) -> Option<&str> {
        match provider {
            ModelProvider::Anthropic => self.anthropic_api_key.as_deref(),
            ModelProvider::OpenAI => self.openai_api_key.as_deref(),
        }
    }

    /// Model client configuration derived from the default model.
    ///
    /// The provider is resolved once here, not per call.
    pub fn model_config(&self) -> ModelConfig {
        let provider = ModelProvider::for_model(&self.default_model);
        ModelConfig {
            provider,
            model: self.default_model.clone(),
            api_key: self.api_key(provider).map(String::from),
            base_url: None,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Validate that required configuration is present.
    ///
    /// Returns the list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.github_token.as_deref().unwrap_or("").is_empty() {
            problems.push("GITHUB_TOKEN is not set".to_string());
        }

        let provider = ModelProvider::for_model(&self.default_model);
        if self.api_key(provider).unwrap_or("").is_empty() {
            problems.push(format!(
                "No API key configured for the default model provider ({})",
                provider
            ));
        }

        problems
    }
}
