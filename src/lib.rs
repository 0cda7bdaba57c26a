//! Prepares a machine to run the Claude Desktop MCP plugin servers: installs
//! the runtimes they need, writes `claude_desktop_config.json` and checks that
//! the remote servers answer.

pub mod error;
pub mod mcp_config;
pub mod platform_setup;
pub mod provision;
pub mod reachability;
pub mod settings;
pub mod utils;
