//! REST API handlers
//!
//! Translates HTTP requests into calls on the injected `AgentManager` and
//! maps its errors onto status codes. The handlers add no behavior of their
//! own; failures from the model or GitHub surface with their original
//! messages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::{AgentContext, AgentError, AgentManager, CreateOptions, GitHubError, LlmError};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub manager: Arc<AgentManager>,
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentDto {
    #[serde(rename = "type")]
    pub agent_type: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub conversation_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    #[serde(rename = "type")]
    pub agent_type: String,
    pub id: Option<String>,
    #[serde(default)]
    pub multi_turn: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub input: String,
    pub repository: Option<String>,
    pub issue_number: Option<u64>,
    pub pr_number: Option<u64>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub response: String,
}

/// Map an agent error to the HTTP status the boundary owes the caller.
///
/// Not-found conditions (unknown agent id, missing GitHub objects) map to
/// 404, duplicate ids to 409, upstream provider failures to 502, and local
/// configuration failures to 500.
fn error_status(err: &AgentError) -> StatusCode {
    match err {
        AgentError::NotFound(_) => StatusCode::NOT_FOUND,
        AgentError::Duplicate(_) => StatusCode::CONFLICT,
        AgentError::UnknownType(_) => StatusCode::BAD_REQUEST,
        AgentError::GitHub(GitHubError::NotFound(_)) => StatusCode::NOT_FOUND,
        AgentError::GitHub(_) => StatusCode::BAD_GATEWAY,
        AgentError::Model(LlmError::MissingCredential(_) | LlmError::UnknownProvider(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AgentError::Model(LlmError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
        AgentError::Model(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: AgentError) -> (StatusCode, Json<Value>) {
    let status = error_status(&err);
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, Json(json!({ "error": err.to_string() })))
}

async fn agent_dto(manager: &AgentManager, descriptor: crate::agents::AgentDescriptor) -> AgentDto {
    let conversation_length = match manager.get(&descriptor.id).await {
        Ok(agent) => agent.history_len().await,
        Err(_) => 0,
    };
    AgentDto {
        agent_type: descriptor.agent_type,
        id: descriptor.id,
        name: descriptor.name,
        description: descriptor.description,
        conversation_length,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /agents
pub async fn list_agents(State(state): State<ApiState>) -> impl IntoResponse {
    let mut agents = Vec::new();
    for descriptor in state.manager.list().await {
        agents.push(agent_dto(&state.manager, descriptor).await);
    }

    (StatusCode::OK, Json(agents))
}

/// POST /agents
pub async fn create_agent(
    State(state): State<ApiState>,
    Json(request): Json<CreateAgentRequest>,
) -> impl IntoResponse {
    let id = request.id.unwrap_or_else(|| request.agent_type.clone());

    let options = CreateOptions {
        multi_turn: request.multi_turn,
        ..CreateOptions::default()
    };

    match state.manager.create(&request.agent_type, &id, options).await {
        Ok(agent) => {
            let dto = AgentDto {
                agent_type: agent.role().type_name().to_string(),
                id,
                name: agent.role().display_name().to_string(),
                description: agent.role().description().to_string(),
                conversation_length: 0,
            };
            (StatusCode::CREATED, Json(dto)).into_response()
        }
        Err(err) => error_response(err).into_response(),
    }
}

/// GET /agents/:id
pub async fn get_agent(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let descriptor = state.manager.list().await.into_iter().find(|d| d.id == id);

    match descriptor {
        Some(descriptor) => {
            let dto = agent_dto(&state.manager, descriptor).await;
            (StatusCode::OK, Json(dto)).into_response()
        }
        None => error_response(AgentError::NotFound(id)).into_response(),
    }
}

/// DELETE /agents/:id
pub async fn delete_agent(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.manager.remove(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Agent deleted" })),
        )
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /agents/:id/execute
pub async fn execute_agent(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ExecuteRequest>,
) -> impl IntoResponse {
    let context = AgentContext::from_parts(
        request.repository,
        request.issue_number,
        request.pr_number,
        request.metadata,
    );

    match state.manager.execute(&id, &context, &request.input).await {
        Ok(response) => (StatusCode::OK, Json(ExecuteResponse { response })).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// DELETE /agents/:id/conversation
pub async fn clear_conversation(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.manager.clear_history(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Conversation cleared" })),
        )
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}
