//! git-tools-mcp: MCP server exposing read-only git queries.
//!
//! Wraps a handful of git query commands behind MCP tools so that an
//! external agent can request commit history, commit messages, diffs,
//! changed-file lists, and repository detection without shelling out
//! itself. Serves over stdio by default, or streamable HTTP with `--http`.

pub mod cli;
pub mod runner;
pub mod server;
pub mod tools;
