mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agentctx",
    about = "Keep AI agent context files in sync with the current feature plan",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .specify/ or .git/)
    #[arg(long, global = true, env = "AGENTCTX_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Feature to use instead of the checked-out branch (e.g. 001-login)
    #[arg(long, global = true, env = "SPECIFY_FEATURE")]
    feature: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh agent context files from the current feature's plan
    Update {
        /// Agent type, e.g. claude or cursor-agent (omit to refresh every agent file present)
        #[arg(value_name = "AGENT_TYPE")]
        agent: Option<String>,
    },

    /// List supported agent types and their context files
    Agents,

    /// Show the current feature, its plan and recent features
    Status,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let feature = cli.feature.as_deref();

    let result = match cli.command {
        Commands::Update { agent } => cmd::update::run(&root, agent.as_deref(), feature, cli.json),
        Commands::Agents => cmd::agents::run(&root, cli.json),
        Commands::Status => cmd::status::run(&root, feature, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
