//! # Mentor
//!
//! Mentor is a thin orchestration layer that dispatches text prompts to AI
//! model providers (Anthropic Claude, OpenAI GPT) and forwards GitHub
//! metadata (issues, pull requests) into those prompts. The result is exposed
//! through a CLI and a small REST server.
//!
//! ## Architecture
//!
//! - **agents**: the dispatch core - registry, roles, execution, model clients
//! - **github**: read-only repository/issue/PR context fetching
//! - **adapters**: HTTP handlers translating requests into manager calls
//! - **config**: environment-backed settings
//!
//! The `AgentManager` is constructed explicitly and injected into every
//! boundary adapter; there is no hidden global state.

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod github;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(state: ApiState) -> Router {
    let health_handler = Arc::new(HealthHandler::new());

    let api_router = Router::new()
        .route(
            "/agents",
            get(api_handler::list_agents).post(api_handler::create_agent),
        )
        .route(
            "/agents/:id",
            get(api_handler::get_agent).delete(api_handler::delete_agent),
        )
        .route("/agents/:id/execute", post(api_handler::execute_agent))
        .route(
            "/agents/:id/conversation",
            delete(api_handler::clear_conversation),
        )
        .with_state(state);

    let router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .merge(api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
