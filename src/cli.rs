//! # Command-Line Arguments
//!
//! Transport selection and runner configuration for the server binary.

use std::path::PathBuf;

use clap::Parser;

/// Git Tools MCP Server.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "git-tools-mcp",
    version,
    about = "Expose read-only git queries as MCP tools"
)]
pub struct CommandArguments {
    /// Serve over streamable HTTP instead of stdio.
    #[arg(long)]
    pub http: bool,

    /// Port for the HTTP transport.
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Bind host for the HTTP transport.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout in seconds applied to every git invocation. Unbounded when
    /// absent.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Git binary to invoke.
    #[arg(long, default_value = "git")]
    pub git_bin: String,

    /// Append logs to this file in addition to stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CommandArguments {
    pub fn validate(&self) -> Result<(), String> {
        if self.git_bin.trim().is_empty() {
            return Err("--git-bin must not be empty".to_string());
        }
        if let Some(path) = &self.log_file {
            if path.file_name().is_none() {
                return Err(format!("--log-file has no file name: {}", path.display()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_stdio_serving() {
        let args = CommandArguments::parse_from(["git-tools-mcp"]);
        assert!(!args.http);
        assert_eq!(args.port, 8000);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.git_bin, "git");
        assert!(args.timeout.is_none());
        assert!(args.log_file.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn http_flags_parse() {
        let args = CommandArguments::parse_from([
            "git-tools-mcp",
            "--http",
            "--port",
            "9001",
            "--host",
            "0.0.0.0",
            "--timeout",
            "30",
        ]);
        assert!(args.http);
        assert_eq!(args.port, 9001);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.timeout, Some(30));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn empty_git_bin_is_rejected() {
        let args = CommandArguments::parse_from(["git-tools-mcp", "--git-bin", " "]);
        assert!(args.validate().is_err());
    }
}
