//! Agent execution

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::agents::context::AgentContext;
use crate::agents::error::AgentResult;
use crate::agents::llm::{ModelClient, Turn};
use crate::agents::role::AgentRole;
use crate::github::GitHubPort;

/// A live agent instance: a role bound to shared model and GitHub clients,
/// with an in-memory turn history.
pub struct Agent {
    role: AgentRole,
    model: Arc<dyn ModelClient>,
    github: Arc<dyn GitHubPort>,
    multi_turn: bool,
    history: Mutex<Vec<Turn>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("multi_turn", &self.multi_turn)
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn new(
        role: AgentRole,
        model: Arc<dyn ModelClient>,
        github: Arc<dyn GitHubPort>,
        multi_turn: bool,
    ) -> Self {
        Self {
            role,
            model,
            github,
            multi_turn,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn role(&self) -> &AgentRole {
        &self.role
    }

    /// Whether this agent feeds its turn history back into the model
    pub fn is_multi_turn(&self) -> bool {
        self.multi_turn
    }

    /// Execute the agent: assemble the prompt from context and input, call
    /// the model, record the turn, and return the model text verbatim.
    ///
    /// A fetch or model failure aborts the call and surfaces unchanged; in
    /// particular the model is never called when the fetch fails.
    pub async fn execute(&self, context: &AgentContext, user_input: &str) -> AgentResult<String> {
        let github_context = match &context.repository {
            Some(repository) => Some(
                self.github
                    .fetch(repository, context.issue_number, context.pr_number)
                    .await?,
            ),
            None => None,
        };

        let prompt = self.role.compose_prompt(github_context.as_deref(), user_input);

        let response = if self.multi_turn {
            // The history lock is held across the model call so concurrent
            // executes on the same agent cannot interleave their appends.
            let mut history = self.history.lock().await;

            let mut turns = Vec::with_capacity(history.len() + 2);
            turns.push(Turn::system(self.role.system_prompt()));
            turns.extend(history.iter().cloned());
            turns.push(Turn::user(prompt.clone()));

            let response = self.model.chat(&turns).await?;
            history.push(Turn::user(prompt));
            history.push(Turn::assistant(response.clone()));
            response
        } else {
            let response = self
                .model
                .generate(&prompt, Some(self.role.system_prompt()))
                .await?;

            let mut history = self.history.lock().await;
            history.push(Turn::user(prompt));
            history.push(Turn::assistant(response.clone()));
            response
        };

        Ok(response)
    }

    /// Number of recorded turns
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Drop all recorded turns
    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::error::{GitHubError, GitHubResult, LlmResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Model stub that echoes the prompt it was given
    #[derive(Debug)]
    struct EchoModel {
        calls: AtomicUsize,
    }

    impl EchoModel {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl ModelClient for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn generate(&self, prompt: &str, _system_prompt: Option<&str>) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(prompt.to_string())
        }

        async fn chat(&self, turns: &[Turn]) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("seen {} turns: {}", turns.len(), turns.last().unwrap().content))
        }
    }

    /// Fetcher stub returning fixed text
    struct StaticGitHub;

    #[async_trait]
    impl GitHubPort for StaticGitHub {
        async fn fetch(
            &self,
            repository: &str,
            _issue_number: Option<u64>,
            _pr_number: Option<u64>,
        ) -> GitHubResult<String> {
            Ok(format!("Repository: {}\n", repository))
        }
    }

    /// Fetcher stub that always fails with NotFound
    struct MissingGitHub;

    #[async_trait]
    impl GitHubPort for MissingGitHub {
        async fn fetch(
            &self,
            repository: &str,
            _issue_number: Option<u64>,
            _pr_number: Option<u64>,
        ) -> GitHubResult<String> {
            Err(GitHubError::NotFound(format!("repository {}", repository)))
        }
    }

    #[tokio::test]
    async fn test_execute_echoes_user_input() {
        let model = EchoModel::new();
        let agent = Agent::new(AgentRole::CodeReview, model, Arc::new(StaticGitHub), false);

        let input = "Review this: def add(a,b): return a+b";
        let response = agent.execute(&AgentContext::new(), input).await.unwrap();

        assert!(response.contains(input));
    }

    #[tokio::test]
    async fn test_repository_context_reaches_prompt() {
        let model = EchoModel::new();
        let agent = Agent::new(AgentRole::CodeReview, model, Arc::new(StaticGitHub), false);

        let context = AgentContext::new().with_repository("octocat/hello").with_pr(7);
        let response = agent.execute(&context, "check error paths").await.unwrap();

        assert!(response.contains("Repository: octocat/hello"));
        assert!(response.contains("check error paths"));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_model_call() {
        let model = EchoModel::new();
        let agent = Agent::new(
            AgentRole::IssueTriage,
            model.clone(),
            Arc::new(MissingGitHub),
            false,
        );

        let context = AgentContext::new().with_repository("octocat/gone").with_issue(1);
        let err = agent.execute(&context, "triage this").await.unwrap_err();

        assert!(matches!(
            err,
            crate::agents::error::AgentError::GitHub(GitHubError::NotFound(_))
        ));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(agent.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_history_records_both_turns() {
        let model = EchoModel::new();
        let agent = Agent::new(AgentRole::Documentation, model, Arc::new(StaticGitHub), false);

        agent.execute(&AgentContext::new(), "fn parse()").await.unwrap();
        assert_eq!(agent.history_len().await, 2);

        agent.execute(&AgentContext::new(), "fn render()").await.unwrap();
        assert_eq!(agent.history_len().await, 4);

        agent.clear_history().await;
        assert_eq!(agent.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_multi_turn_agent_feeds_history_to_chat() {
        let model = EchoModel::new();
        let agent = Agent::new(AgentRole::Documentation, model, Arc::new(StaticGitHub), true);

        // First call: system + user = 2 turns
        let first = agent.execute(&AgentContext::new(), "first").await.unwrap();
        assert!(first.starts_with("seen 2 turns"));

        // Second call: system + 2 history + user = 4 turns
        let second = agent.execute(&AgentContext::new(), "second").await.unwrap();
        assert!(second.starts_with("seen 4 turns"));
    }
}
