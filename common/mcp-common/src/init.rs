//! Server initialization utilities
//!
//! Tracing goes to stderr because stdout carries the MCP protocol.

use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count onto a level for the server crate.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing for an MCP server
///
/// `RUST_LOG` is honoured first; the crate itself defaults to `info`, raised
/// by `verbosity`. Set `LOG_FORMAT=json` for JSON lines instead of text.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("fop_workflow_mcp", cli.verbose)?;
/// ```
pub fn init_tracing(crate_name: &str, verbosity: u8) -> anyhow::Result<()> {
    let directive = format!("{}={}", crate_name, level_for(verbosity));
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Serve an already constructed MCP server over stdio until the client disconnects
pub async fn serve_stdio<S>(server: S, name: &str) -> anyhow::Result<()>
where
    S: rmcp::ServerHandler,
{
    tracing::info!(server = name, "Starting MCP server on stdio");

    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("Server running, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
