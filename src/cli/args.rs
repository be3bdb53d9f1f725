//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::{
    build_launch_args, resolve_api_key_override, resolve_config_path, resolve_transport,
    LaunchProfile, TransportMode,
};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "ScrAPI MCP server (stdio or streamable HTTP)",
    long_about = None
)]
pub struct LaunchProfileArgs {
    /// Select stdio (default) or http; MCP_TRANSPORT is the fallback.
    #[arg(long, value_enum)]
    pub transport: Option<TransportMode>,
    /// Path to config.toml (overrides MCP_CONFIG_PATH).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
    /// Default ScrAPI API key override (overrides SCRAPI_API_KEY).
    #[arg(long = "api-key")]
    pub api_key_override: Option<String>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let config_path = resolve_config_path(self.config_override)?;
        let transport = resolve_transport(self.transport);
        let (api_key_override, api_key_source) = resolve_api_key_override(self.api_key_override);

        let launch_args = build_launch_args(transport, &config_path);

        Ok(LaunchProfile {
            config_path,
            transport,
            api_key_override,
            api_key_source,
            launch_args,
        })
    }
}
