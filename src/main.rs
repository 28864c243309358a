use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use mentor::adapters::api_handler::ApiState;
use mentor::agents::llm::create_client;
use mentor::agents::{AgentContext, AgentManager, CreateOptions};
use mentor::cli::{AgentAction, Cli, Command, ConfigAction};
use mentor::config::Settings;
use mentor::github::GitHubClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new()?;

    match cli.command {
        Command::Config { action } => run_config(action, &settings),
        Command::Agent { action } => run_agent(action, &settings).await,
        Command::Server { host, port } => run_server(host, port, settings).await,
    }
}

fn run_config(action: ConfigAction, settings: &Settings) -> anyhow::Result<()> {
    match action {
        ConfigAction::Validate => {
            let problems = settings.validate();
            if problems.is_empty() {
                println!("Configuration is valid");
                Ok(())
            } else {
                for problem in &problems {
                    eprintln!("Warning: {}", problem);
                }
                anyhow::bail!("Configuration is invalid");
            }
        }
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  GitHub token: {}", mask(&settings.github_token));
            println!("  Anthropic API key: {}", mask(&settings.anthropic_api_key));
            println!("  OpenAI API key: {}", mask(&settings.openai_api_key));
            println!("  Default model: {}", settings.default_model);
            println!("  Max tokens: {}", settings.max_tokens);
            println!("  Temperature: {}", settings.temperature);
            println!("  Server: {}:{}", settings.server_host, settings.server_port);
            Ok(())
        }
    }
}

fn mask(value: &Option<String>) -> &'static str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => "********************",
        _ => "Not set",
    }
}

fn build_manager(settings: &Settings) -> anyhow::Result<Arc<AgentManager>> {
    let model = create_client(&settings.model_config())?;
    let github = Arc::new(GitHubClient::new(
        settings.github_token.clone().unwrap_or_default(),
    ));
    Ok(Arc::new(AgentManager::new(model, github)))
}

async fn run_agent(action: AgentAction, settings: &Settings) -> anyhow::Result<()> {
    match action {
        AgentAction::List => {
            let manager = build_manager(settings)?;

            println!("Available agent types:");
            for agent_type in manager.available_types().await {
                println!("  - {}", agent_type);
            }

            let agents = manager.list().await;
            if agents.is_empty() {
                println!("\nNo active agents");
            } else {
                println!("\nActive agents:");
                for descriptor in agents {
                    println!("  - {}: {}", descriptor.id, descriptor.name);
                }
            }
            Ok(())
        }
        AgentAction::Create { agent_type, id, multi_turn } => {
            let manager = build_manager(settings)?;
            let id = id.unwrap_or_else(|| agent_type.clone());

            let agent = manager
                .create(&agent_type, &id, CreateOptions { multi_turn, ..Default::default() })
                .await?;
            println!("Created agent '{}': {}", id, agent.role().display_name());
            Ok(())
        }
        AgentAction::Execute { id, input, agent_type, repo, issue, pr } => {
            let manager = build_manager(settings)?;

            // Each CLI invocation starts with an empty registry, so the
            // agent is created on the fly; --type wins over the id.
            if manager.get(&id).await.is_err() {
                let agent_type = agent_type.unwrap_or_else(|| id.clone());
                manager.create(&agent_type, &id, CreateOptions::default()).await?;
            }

            let context = AgentContext::from_parts(repo, issue, pr, Default::default());

            let response = manager.execute(&id, &context, &input).await?;
            println!("{}", response);
            Ok(())
        }
    }
}

async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server_host.clone());
    let port = port.unwrap_or(settings.server_port);

    for problem in settings.validate() {
        tracing::warn!("{}", problem);
    }

    let manager = build_manager(&settings)?;
    let app = mentor::create_app(ApiState { manager });

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting Mentor agent server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
