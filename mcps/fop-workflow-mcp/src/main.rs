//! FOP Workflow MCP Server
//!
//! Serves the FOP workflow rule repository to coding agents over MCP stdio.
//!
//! # Usage
//!
//! ```text
//! fop-workflow-mcp --root /path/to/project          # serve
//! fop-workflow-mcp config --output mcp-config.json  # client config snippet
//! fop-workflow-mcp check [--json]                   # verify rule documents
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use fop_workflow_mcp::{
    client::client_config, health::check_repository, DocumentStore, FopWorkflowMcpServer,
    RepositoryConfig,
};

#[derive(Parser)]
#[command(name = "fop-workflow-mcp")]
#[command(about = "FOP workflow MCP server - FOP development rules and guidance for AI agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Rule repository root (default: from config file or the current directory)
    #[arg(long, env = "FOP_RULES_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tools over stdio (default)
    Serve,
    /// Print or write an MCP client configuration snippet
    Config {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check that every rule document can be read and parsed
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing("fop_workflow_mcp", cli.verbose)?;

    let mut config = RepositoryConfig::load();
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = FopWorkflowMcpServer::with_config(&config);
            mcp_common::serve_stdio(server, fop_workflow_mcp::SERVER_NAME).await
        }
        Commands::Config { output } => write_client_config(&config, output),
        Commands::Check { json } => check(&config, json),
    }
}

fn write_client_config(config: &RepositoryConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let command = std::env::current_exe().context("Failed to locate own executable")?;
    let root = std::fs::canonicalize(&config.root)
        .with_context(|| format!("Repository root {} not found", config.root.display()))?;

    let snippet = serde_json::to_string_pretty(&client_config(&command, &root))?;

    match output {
        Some(path) => {
            std::fs::write(&path, snippet)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Client config written to {}", path.display());
            println!("Add it to your MCP client configuration");
        }
        None => println!("{}", snippet),
    }
    Ok(())
}

fn check(config: &RepositoryConfig, json: bool) -> anyhow::Result<()> {
    let report = check_repository(&DocumentStore::from_config(config));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Checking rule repository at {}", config.root.display());
        for status in &report {
            println!("  {}", status.line());
        }
    }

    let failed = report.iter().filter(|s| !s.ok).count();
    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, report.len());
    }

    if !json {
        println!("All {} documents readable", report.len());
    }
    Ok(())
}
