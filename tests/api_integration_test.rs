use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use mentor::adapters::api_handler::ApiState;
use mentor::agents::error::{GitHubError, GitHubResult, LlmResult};
use mentor::agents::llm::{ModelClient, Turn};
use mentor::agents::AgentManager;
use mentor::github::GitHubPort;

/// Model stub that echoes the prompt it was given
#[derive(Debug)]
struct EchoModel;

#[async_trait]
impl ModelClient for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }

    async fn generate(&self, prompt: &str, _system_prompt: Option<&str>) -> LlmResult<String> {
        Ok(prompt.to_string())
    }

    async fn chat(&self, turns: &[Turn]) -> LlmResult<String> {
        Ok(turns.last().map(|t| t.content.clone()).unwrap_or_default())
    }
}

/// Fetcher stub: known repositories produce a summary, `octocat/missing`
/// does not exist
struct FakeGitHub;

#[async_trait]
impl GitHubPort for FakeGitHub {
    async fn fetch(
        &self,
        repository: &str,
        issue_number: Option<u64>,
        _pr_number: Option<u64>,
    ) -> GitHubResult<String> {
        if repository == "octocat/missing" {
            return Err(GitHubError::NotFound(format!("repository {}", repository)));
        }

        let mut summary = format!("Repository: {}\n", repository);
        if let Some(n) = issue_number {
            summary.push_str(&format!("Issue #{}: Sample issue\n", n));
        }
        Ok(summary)
    }
}

struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    pub async fn new() -> Self {
        let manager = Arc::new(AgentManager::new(Arc::new(EchoModel), Arc::new(FakeGitHub)));
        let app = mentor::create_app(ApiState { manager });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for the server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;
    assert_ne!(server.addr.port(), 0);
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_agent_lifecycle() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    // Empty registry at startup
    let response = client.get(server.url("/agents")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);

    // Create three agents
    for id in ["a", "b", "c"] {
        let response = client
            .post(server.url("/agents"))
            .json(&json!({ "type": "code_review", "id": id }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    // Listed exactly once each, in creation order
    let response = client.get(server.url("/agents")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    // Duplicate id conflicts
    let response = client
        .post(server.url("/agents"))
        .json(&json!({ "type": "documentation", "id": "b" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // Fetch one agent
    let response = client.get(server.url("/agents/b")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["type"], "code_review");
    assert_eq!(body["conversation_length"], 0);

    // Delete, then the id is gone
    let response = client.delete(server.url("/agents/b")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(server.url("/agents/b")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let response = client.delete(server.url("/agents/b")).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_unknown_type() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/agents"))
        .json(&json!({ "type": "fortune_teller", "id": "f" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("fortune_teller"));

    // Nothing was registered
    let response = client.get(server.url("/agents")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_execute_echoes_input() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/agents"))
        .json(&json!({ "type": "code_review", "id": "cr" }))
        .send()
        .await
        .unwrap();

    let input = "Review this: def add(a,b): return a+b";
    let response = client
        .post(server.url("/agents/cr/execute"))
        .json(&json!({ "input": input }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(body["response"].as_str().unwrap().contains(input));
}

#[tokio::test]
async fn test_execute_with_repository_context() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/agents"))
        .json(&json!({ "type": "issue_triage", "id": "triage" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(server.url("/agents/triage/execute"))
        .json(&json!({
            "input": "is this urgent?",
            "repository": "octocat/hello",
            "issue_number": 42
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let text = body["response"].as_str().unwrap();
    assert!(text.contains("Repository: octocat/hello"));
    assert!(text.contains("Issue #42"));
}

#[tokio::test]
async fn test_execute_missing_repository_is_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/agents"))
        .json(&json!({ "type": "code_review", "id": "cr" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(server.url("/agents/cr/execute"))
        .json(&json!({ "input": "review", "repository": "octocat/missing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("octocat/missing"));
}

#[tokio::test]
async fn test_execute_unknown_agent_is_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/agents/ghost/execute"))
        .json(&json!({ "input": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_conversation_tracking_and_clear() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    client
        .post(server.url("/agents"))
        .json(&json!({ "type": "documentation", "id": "doc", "multi_turn": true }))
        .send()
        .await
        .unwrap();

    for input in ["document fn parse()", "now document fn render()"] {
        let response = client
            .post(server.url("/agents/doc/execute"))
            .json(&json!({ "input": input }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    // Two executions -> four recorded turns
    let response = client.get(server.url("/agents/doc")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["conversation_length"], 4);

    let response = client
        .delete(server.url("/agents/doc/conversation"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(server.url("/agents/doc")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["conversation_length"], 0);

    // Clearing an unknown agent's conversation is 404
    let response = client
        .delete(server.url("/agents/ghost/conversation"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_concurrent_creates_all_land() {
    let server = TestServer::new().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let url = server.url("/agents");
        handles.push(tokio::spawn(async move {
            reqwest::Client::new()
                .post(url)
                .json(&json!({ "type": "code_review", "id": format!("agent-{}", i) }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 201);
    }

    let response = reqwest::Client::new()
        .get(server.url("/agents"))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 8);
}
