//! Execution context for agent calls

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Context information for one agent execution.
///
/// Constructed fresh per call and never mutated afterwards; the builder
/// methods consume and return the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    /// Repository identifier in `owner/name` form
    pub repository: Option<String>,
    /// Issue number within the repository
    pub issue_number: Option<u64>,
    /// Pull request number within the repository
    pub pr_number: Option<u64>,
    /// Open-ended extra metadata attached by the caller
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AgentContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self {
            repository: None,
            issue_number: None,
            pr_number: None,
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a context from raw optional parts, the shape boundary
    /// adapters receive
    pub fn from_parts(
        repository: Option<String>,
        issue_number: Option<u64>,
        pr_number: Option<u64>,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self {
            repository,
            issue_number,
            pr_number,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Attach a repository identifier (`owner/name`)
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Attach an issue number
    pub fn with_issue(mut self, issue_number: u64) -> Self {
        self.issue_number = Some(issue_number);
        self
    }

    /// Attach a pull request number
    pub fn with_pr(mut self, pr_number: u64) -> Self {
        self.pr_number = Some(pr_number);
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl Default for AgentContext {
    fn default() -> Self {
        Self::new()
    }
}
