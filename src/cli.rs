use clap::{Parser, Subcommand};

/// AI agent dispatch - send prompts with GitHub context to model providers
#[derive(Parser, Debug)]
#[command(name = "mentor", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Interact with agents
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Run the REST API server
    Server {
        /// Server host address
        #[arg(long, env = "SERVER_HOST")]
        host: Option<String>,

        /// Server port
        #[arg(long, env = "SERVER_PORT")]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Check that required configuration is present
    Validate,
    /// Print the current configuration with secrets masked
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AgentAction {
    /// List available agent types and live agents
    List,
    /// Create a new agent
    Create {
        /// Agent type to instantiate
        #[arg(long = "type")]
        agent_type: String,

        /// Agent id (defaults to the type name)
        #[arg(long)]
        id: Option<String>,

        /// Keep turn history and feed it back into the model
        #[arg(long)]
        multi_turn: bool,
    },
    /// Execute an agent with the given input
    Execute {
        /// Agent id
        #[arg(long)]
        id: String,

        /// Input text for the agent
        #[arg(long)]
        input: String,

        /// Agent type, used when the agent has to be created first
        #[arg(long = "type")]
        agent_type: Option<String>,

        /// Repository name (owner/repo)
        #[arg(long)]
        repo: Option<String>,

        /// Issue number
        #[arg(long)]
        issue: Option<u64>,

        /// Pull request number
        #[arg(long)]
        pr: Option<u64>,
    },
}
