//! GitHub context fetching
//!
//! Read-only retrieval of repository, issue and pull request metadata as
//! plain text, for injection into agent prompts.

mod client;

pub use client::GitHubClient;

use async_trait::async_trait;

use crate::agents::error::GitHubResult;

/// Read-only port for fetching repository context.
///
/// Agents hold this behind a trait object so tests can substitute stubs.
#[async_trait]
pub trait GitHubPort: Send + Sync {
    /// Fetch a plain-text summary of a repository, optionally including one
    /// issue and/or one pull request.
    async fn fetch(
        &self,
        repository: &str,
        issue_number: Option<u64>,
        pr_number: Option<u64>,
    ) -> GitHubResult<String>;
}
