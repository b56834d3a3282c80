//! # MCP Server
//!
//! Registers the git query tools with an rmcp tool router and serves them
//! over stdio or streamable HTTP. Runner failures are kept out of the
//! success channel: exit failures and timeouts become tool-level error
//! results, spawn failures become protocol errors.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
    transport::streamable_http_server::{
        StreamableHttpService, session::local::LocalSessionManager,
    },
};
use serde::Deserialize;

use crate::cli::CommandArguments;
use crate::runner::{GitError, GitRunner};
use crate::tools::{DEFAULT_HISTORY_LEN, GitTools};

/// Parameters for `get_commit_history`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommitHistoryArgs {
    /// Number of commits to retrieve (default 10). Zero or negative yields
    /// an empty list.
    pub n: Option<i64>,
    /// Repository directory; the server process cwd when absent.
    pub cwd: Option<PathBuf>,
}

/// Parameters for the tools that inspect a single commit.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommitArgs {
    /// Commit hash to inspect.
    pub commit_hash: String,
    /// Repository directory; the server process cwd when absent.
    pub cwd: Option<PathBuf>,
}

/// Parameters for `is_git_repo`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RepoCheckArgs {
    /// Directory to probe; the server process cwd when absent.
    pub cwd: Option<PathBuf>,
}

/// MCP-facing wrapper around [`GitTools`].
#[derive(Clone)]
pub struct GitToolsServer {
    tools: GitTools,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GitToolsServer {
    pub fn new(tools: GitTools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get the last n commit hashes, most recent first, as a JSON array.")]
    async fn get_commit_history(
        &self,
        Parameters(CommitHistoryArgs { n, cwd }): Parameters<CommitHistoryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let n = n.unwrap_or(DEFAULT_HISTORY_LEN);
        match self.tools.commit_history(n, cwd.as_deref()).await {
            Ok(hashes) => json_result(&hashes),
            Err(err) => tool_failure(err),
        }
    }

    #[tool(description = "Get the full commit message for a given commit hash.")]
    async fn get_commit_message(
        &self,
        Parameters(CommitArgs { commit_hash, cwd }): Parameters<CommitArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_hash(&commit_hash)?;
        match self.tools.commit_message(&commit_hash, cwd.as_deref()).await {
            Ok(message) => Ok(CallToolResult::success(vec![Content::text(message)])),
            Err(err) => tool_failure(err),
        }
    }

    #[tool(description = "Get the diff for a given commit hash (no commit header, zero context).")]
    async fn get_commit_diff(
        &self,
        Parameters(CommitArgs { commit_hash, cwd }): Parameters<CommitArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_hash(&commit_hash)?;
        match self.tools.commit_diff(&commit_hash, cwd.as_deref()).await {
            Ok(diff) => Ok(CallToolResult::success(vec![Content::text(diff)])),
            Err(err) => tool_failure(err),
        }
    }

    #[tool(description = "Get the list of files changed in a given commit, as a JSON array.")]
    async fn get_changed_files(
        &self,
        Parameters(CommitArgs { commit_hash, cwd }): Parameters<CommitArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_hash(&commit_hash)?;
        match self.tools.changed_files(&commit_hash, cwd.as_deref()).await {
            Ok(files) => json_result(&files),
            Err(err) => tool_failure(err),
        }
    }

    #[tool(description = "Check whether the given directory is inside a git repository.")]
    async fn is_git_repo(
        &self,
        Parameters(RepoCheckArgs { cwd }): Parameters<RepoCheckArgs>,
    ) -> Result<CallToolResult, McpError> {
        match self.tools.is_repo(cwd.as_deref()).await {
            Ok(flag) => Ok(CallToolResult::success(vec![Content::text(flag.to_string())])),
            Err(err) => tool_failure(err),
        }
    }
}

#[tool_handler]
impl ServerHandler for GitToolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Read-only git queries: commit history, messages, diffs, changed files, \
                 and repository detection. Pass `cwd` to select the repository."
                    .to_string(),
            ),
        }
    }
}

fn require_hash(commit_hash: &str) -> Result<(), McpError> {
    if commit_hash.trim().is_empty() {
        return Err(McpError::invalid_params("commit_hash must not be empty", None));
    }
    Ok(())
}

fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let payload =
        serde_json::to_string(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(payload)]))
}

/// Exit failures and timeouts are legitimate tool outcomes; only a spawn
/// failure is a protocol-level fault.
fn tool_failure(err: GitError) -> Result<CallToolResult, McpError> {
    match err {
        GitError::Spawn(_) => Err(McpError::internal_error(err.to_string(), None)),
        GitError::ExitFailure { .. } | GitError::TimedOut(_) => {
            Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
        }
    }
}

/// Serve the git tools over the transport selected by `args`.
pub async fn start_server(args: CommandArguments) -> Result<()> {
    let timeout = args.timeout.map(Duration::from_secs);
    let runner = GitRunner::new(&args.git_bin, timeout);
    let tools = GitTools::new(runner);

    if args.http {
        serve_http(tools, &args.host, args.port).await
    } else {
        serve_stdio(tools).await
    }
}

async fn serve_stdio(tools: GitTools) -> Result<()> {
    tracing::info!("Serving git tools over stdio");
    let service = GitToolsServer::new(tools)
        .serve(stdio())
        .await
        .context("Failed to start stdio transport")?;
    service.waiting().await?;
    Ok(())
}

async fn serve_http(tools: GitTools, host: &str, port: u16) -> Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(GitToolsServer::new(tools.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Serving git tools over HTTP at http://{addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
