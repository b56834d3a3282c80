//! Git Tools MCP server binary.
//!
//! Parses arguments, wires up logging, and hands off to the server. In
//! stdio mode stdout carries the MCP protocol, so log output goes to
//! stderr (and optionally to a file).

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use git_tools_mcp::cli::CommandArguments;
use git_tools_mcp::server;

#[tokio::main]
async fn main() -> Result<()> {
    let arguments = CommandArguments::parse();
    if let Err(err) = arguments.validate() {
        anyhow::bail!("Invalid arguments: {err}");
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    // Keep the appender guard alive for the lifetime of the process so
    // buffered log lines are flushed on exit.
    let (file_layer, _guard) = match &arguments.log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().context("--log-file has no file name")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Starting git-tools-mcp...");
    server::start_server(arguments).await
}
