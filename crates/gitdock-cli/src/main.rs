//! CLI entry point - the composition root.
//!
//! This is the only place where infrastructure is wired together: the real
//! git runner, the initial workspace configuration, the dispatcher, and the
//! stdio transport. Tracing goes to stderr; stdout belongs to the protocol.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use gitdock_core::{WorkspaceConfig, absolutize};
use gitdock_git::{GitCommandRunner, GitService};
use gitdock_mcp::{Dispatcher, McpServer};

/// Command-line interface for the gitdock MCP server.
#[derive(Parser)]
#[command(name = "gitdock")]
#[command(about = "MCP server exposing git operations over stdio")]
#[command(version)]
struct Cli {
    /// Initial working directory for git commands (defaults to the
    /// directory the server is started from)
    #[arg(long = "working-dir")]
    working_dir: Option<PathBuf>,

    /// Enable verbose/debug output on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Route all diagnostics to stderr. A subscriber on stdout would corrupt
/// the protocol stream.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Captured once: relative working_dir arguments resolve against this
    // for the lifetime of the process.
    let startup_dir = std::env::current_dir()?;
    let initial_dir = cli
        .working_dir
        .map_or_else(|| startup_dir.clone(), |dir| absolutize(&dir, &startup_dir));

    let config = WorkspaceConfig::new(initial_dir);
    tracing::info!(
        working_dir = %config.working_dir().display(),
        "gitdock starting"
    );

    let service = GitService::new(Arc::new(GitCommandRunner::new()), config, startup_dir);
    let server = McpServer::new(Dispatcher::new(service));
    server.run_stdio().await?;

    tracing::info!("gitdock shutting down");
    Ok(())
}
