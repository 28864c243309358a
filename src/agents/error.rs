//! Error types for the agent system

use thiserror::Error;

/// Errors that can occur during agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    /// Agent type has no registered factory
    #[error("Unknown agent type: {0}")]
    UnknownType(String),

    /// Agent not found
    #[error("Agent not found: {0}")]
    NotFound(String),

    /// Agent id already in use
    #[error("Agent already exists: {0}")]
    Duplicate(String),

    /// Model provider error
    #[error("Model error: {0}")]
    Model(#[from] LlmError),

    /// GitHub fetch error
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),
}

/// Errors specific to model provider operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider name has no constructor
    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    /// API key absent at construction time
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Provider returned a non-2xx response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Provider signalled throttling
    #[error("Rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("Connection error: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

/// Errors from the GitHub context fetcher
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Repository, issue or PR does not exist (or the token lacks access)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token invalid or rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// GitHub returned an unexpected non-2xx response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GitHubError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            GitHubError::Network(format!("Connection error: {}", err))
        } else {
            GitHubError::Network(err.to_string())
        }
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for model operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Result type alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;
