//! Agent registry and manager
//!
//! Maps type names to factories and instance ids to live agents. The manager
//! is constructed explicitly and passed by reference into every boundary
//! adapter; there is no global instance.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::agents::agent::Agent;
use crate::agents::context::AgentContext;
use crate::agents::error::{AgentError, AgentResult};
use crate::agents::llm::ModelClient;
use crate::agents::role::AgentRole;
use crate::github::GitHubPort;

/// Everything a factory needs to assemble an agent
pub struct AgentDeps {
    pub model: Arc<dyn ModelClient>,
    pub github: Arc<dyn GitHubPort>,
    pub multi_turn: bool,
}

/// Factory function value producing an agent from its dependencies
pub type AgentFactory = Arc<dyn Fn(AgentDeps) -> Agent + Send + Sync>;

/// Per-create options; `None` fields fall back to the manager's shared
/// clients (the usual case).
#[derive(Default)]
pub struct CreateOptions {
    pub model: Option<Arc<dyn ModelClient>>,
    pub github: Option<Arc<dyn GitHubPort>>,
    pub multi_turn: bool,
}

/// Descriptor of a live agent instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    #[serde(rename = "type")]
    pub agent_type: String,
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Manages agent types and live agent instances
pub struct AgentManager {
    model: Arc<dyn ModelClient>,
    github: Arc<dyn GitHubPort>,
    types: RwLock<HashMap<String, AgentFactory>>,
    /// Live instances; a Vec keeps `list` in insertion order
    agents: RwLock<Vec<(String, Arc<Agent>)>>,
}

fn role_factory(role: AgentRole) -> AgentFactory {
    Arc::new(move |deps: AgentDeps| {
        Agent::new(role.clone(), deps.model, deps.github, deps.multi_turn)
    })
}

fn builtin_types() -> HashMap<String, AgentFactory> {
    let mut types = HashMap::new();
    types.insert("code_review".to_string(), role_factory(AgentRole::CodeReview));
    types.insert("issue_triage".to_string(), role_factory(AgentRole::IssueTriage));
    types.insert("documentation".to_string(), role_factory(AgentRole::Documentation));
    types
}

impl AgentManager {
    /// Create a manager seeded with the built-in agent types.
    ///
    /// The model and GitHub clients are shared by all agents created
    /// without per-agent overrides.
    pub fn new(model: Arc<dyn ModelClient>, github: Arc<dyn GitHubPort>) -> Self {
        Self {
            model,
            github,
            types: RwLock::new(builtin_types()),
            agents: RwLock::new(Vec::new()),
        }
    }

    /// Register (or silently overwrite) an agent type factory.
    ///
    /// Overwriting is the documented behavior: each call is idempotent by
    /// name, and later registrations win.
    pub async fn register_type(&self, name: impl Into<String>, factory: AgentFactory) {
        let name = name.into();
        tracing::debug!("Registering agent type '{}'", name);
        self.types.write().await.insert(name, factory);
    }

    /// Names of all registered agent types, sorted for display
    pub async fn available_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create an agent of `agent_type` and store it under `id`.
    ///
    /// Fails with `UnknownType` before anything is stored, and with
    /// `Duplicate` when the id is already live; creation never overwrites.
    pub async fn create(
        &self,
        agent_type: &str,
        id: &str,
        options: CreateOptions,
    ) -> AgentResult<Arc<Agent>> {
        let factory = self
            .types
            .read()
            .await
            .get(agent_type)
            .cloned()
            .ok_or_else(|| AgentError::UnknownType(agent_type.to_string()))?;

        let deps = AgentDeps {
            model: options.model.unwrap_or_else(|| self.model.clone()),
            github: options.github.unwrap_or_else(|| self.github.clone()),
            multi_turn: options.multi_turn,
        };

        // The write lock spans the duplicate check and the insert so
        // concurrent creates cannot race past each other.
        let mut agents = self.agents.write().await;
        if agents.iter().any(|(existing, _)| existing == id) {
            return Err(AgentError::Duplicate(id.to_string()));
        }

        let agent = Arc::new(factory(deps));
        agents.push((id.to_string(), agent.clone()));
        tracing::info!("Created agent '{}' of type '{}'", id, agent_type);

        Ok(agent)
    }

    /// Get a live agent by id
    pub async fn get(&self, id: &str) -> AgentResult<Arc<Agent>> {
        self.agents
            .read()
            .await
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, agent)| agent.clone())
            .ok_or_else(|| AgentError::NotFound(id.to_string()))
    }

    /// Descriptors of all live agents, in creation order
    pub async fn list(&self) -> Vec<AgentDescriptor> {
        self.agents
            .read()
            .await
            .iter()
            .map(|(id, agent)| AgentDescriptor {
                agent_type: agent.role().type_name().to_string(),
                id: id.clone(),
                name: agent.role().display_name().to_string(),
                description: agent.role().description().to_string(),
            })
            .collect()
    }

    /// Execute the agent stored under `id`.
    ///
    /// Delegates to the agent; its failures are surfaced unchanged.
    pub async fn execute(
        &self,
        id: &str,
        context: &AgentContext,
        user_input: &str,
    ) -> AgentResult<String> {
        let agent = self.get(id).await?;
        agent.execute(context, user_input).await
    }

    /// Remove the agent stored under `id`.
    ///
    /// Fails with `NotFound` when absent, consistent with `get`.
    pub async fn remove(&self, id: &str) -> AgentResult<()> {
        let mut agents = self.agents.write().await;
        match agents.iter().position(|(existing, _)| existing == id) {
            Some(index) => {
                agents.remove(index);
                tracing::info!("Removed agent '{}'", id);
                Ok(())
            }
            None => Err(AgentError::NotFound(id.to_string())),
        }
    }

    /// Clear the turn history of the agent stored under `id`
    pub async fn clear_history(&self, id: &str) -> AgentResult<()> {
        let agent = self.get(id).await?;
        agent.clear_history().await;
        Ok(())
    }
}
