//! GitHub REST API client

use async_trait::async_trait;
use serde::Deserialize;

use super::GitHubPort;
use crate::agents::error::{GitHubError, GitHubResult};

/// GitHub client for read-only repository metadata
pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    /// Create a new GitHub client with an access token.
    ///
    /// An empty token is allowed; unauthenticated requests work for public
    /// repositories, and a rejected token surfaces as an `Auth` error on use.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, "https://api.github.com")
    }

    /// Create a client against a custom API endpoint (GitHub Enterprise,
    /// test servers).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> GitHubResult<T> {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("mentor/", env!("CARGO_PKG_VERSION")));

        if !self.token.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.token));
        }

        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            401 => {
                return Err(GitHubError::Auth("GitHub token was rejected".to_string()));
            }
            403 => {
                let message = response.text().await.unwrap_or_default();
                return Err(GitHubError::Auth(format!("Access forbidden: {}", message)));
            }
            404 => {
                return Err(GitHubError::NotFound(what.to_string()));
            }
            _ => {}
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GitHubError::Parse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GitHubPort for GitHubClient {
    async fn fetch(
        &self,
        repository: &str,
        issue_number: Option<u64>,
        pr_number: Option<u64>,
    ) -> GitHubResult<String> {
        let repo: Repo = self
            .get_json(
                &format!("/repos/{}", repository),
                &format!("repository {}", repository),
            )
            .await?;

        let issue = match issue_number {
            Some(n) => Some(
                self.get_json::<Issue>(
                    &format!("/repos/{}/issues/{}", repository, n),
                    &format!("issue #{} in {}", n, repository),
                )
                .await?,
            ),
            None => None,
        };

        let pull = match pr_number {
            Some(n) => Some(
                self.get_json::<Pull>(
                    &format!("/repos/{}/pulls/{}", repository, n),
                    &format!("pull request #{} in {}", n, repository),
                )
                .await?,
            ),
            None => None,
        };

        Ok(summarize(&repo, issue.as_ref(), pull.as_ref()))
    }
}

/// Render the fetched metadata as the plain-text block agents inject into
/// their prompts.
fn summarize(repo: &Repo, issue: Option<&Issue>, pull: Option<&Pull>) -> String {
    let mut text = format!("Repository: {}\n", repo.full_name);
    if let Some(description) = &repo.description {
        text.push_str(&format!("Description: {}\n", description));
    }
    if let Some(language) = &repo.language {
        text.push_str(&format!("Language: {}\n", language));
    }
    text.push_str(&format!(
        "Default branch: {}\nOpen issues: {}\n",
        repo.default_branch, repo.open_issues_count
    ));

    if let Some(issue) = issue {
        text.push_str(&format!(
            "\nIssue #{}: {}\nState: {}\n",
            issue.number, issue.title, issue.state
        ));
        if !issue.labels.is_empty() {
            let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
            text.push_str(&format!("Labels: {}\n", names.join(", ")));
        }
        text.push_str(&format!("Comments: {}\n", issue.comments));
        text.push_str(&format!(
            "Body: {}\n",
            issue.body.as_deref().unwrap_or("No description provided")
        ));
    }

    if let Some(pull) = pull {
        text.push_str(&format!(
            "\nPull request #{}: {}\nState: {}\n",
            pull.number, pull.title, pull.state
        ));
        text.push_str(&format!(
            "Files changed: {}\nAdditions: +{}\nDeletions: -{}\nCommits: {}\n",
            pull.changed_files, pull.additions, pull.deletions, pull.commits
        ));
        text.push_str(&format!(
            "Body: {}\n",
            pull.body.as_deref().unwrap_or("No description provided")
        ));
    }

    text
}

// GitHub API response types

#[derive(Debug, Deserialize)]
struct Repo {
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    default_branch: String,
    open_issues_count: u64,
}

#[derive(Debug, Deserialize)]
struct Issue {
    number: u64,
    title: String,
    state: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<Label>,
    #[serde(default)]
    comments: u64,
}

#[derive(Debug, Deserialize)]
struct Label {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Pull {
    number: u64,
    title: String,
    state: String,
    body: Option<String>,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    commits: u64,
}
