//! LaunchProfile and transport/key/config resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;

const DEFAULT_CONFIG: &str = "config.toml";
const MCP_CONFIG_ENV: &str = "MCP_CONFIG_PATH";
const MCP_TRANSPORT_ENV: &str = "MCP_TRANSPORT";
const SCRAPI_API_KEY_ENV: &str = "SCRAPI_API_KEY";

/// MCP transport mode.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
}

impl TransportMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Stdio => "stdio",
            TransportMode::Http => "http",
        }
    }
}

/// Source for the default API key override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Env,
    Cli,
    Missing,
}

impl ApiKeySource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ApiKeySource::Env => "env",
            ApiKeySource::Cli => "cli",
            ApiKeySource::Missing => "missing",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    pub transport: TransportMode,
    pub api_key_override: Option<String>,
    pub api_key_source: ApiKeySource,
    pub launch_args: Vec<String>,
}

/// Resolve config path in the order: CLI override → env var → default.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = override_path
        .or_else(|| env::var_os(MCP_CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}

/// Resolve transport in the order: CLI override → env var → stdio.
pub fn resolve_transport(cli_transport: Option<TransportMode>) -> TransportMode {
    if let Some(mode) = cli_transport {
        return mode;
    }

    match env::var(MCP_TRANSPORT_ENV).ok().as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("http") => TransportMode::Http,
        _ => TransportMode::Stdio,
    }
}

/// Resolve the default-key override in the order: CLI override → env var.
/// Only blanks are rejected locally; the scraping service decides what a
/// usable key looks like.
pub fn resolve_api_key_override(key_override: Option<String>) -> (Option<String>, ApiKeySource) {
    if let Some(key) = key_override.and_then(|v| normalize_api_key(&v)) {
        return (Some(key), ApiKeySource::Cli);
    }

    if let Some(env_key) = env::var(SCRAPI_API_KEY_ENV)
        .ok()
        .and_then(|v| normalize_api_key(&v))
    {
        return (Some(env_key), ApiKeySource::Env);
    }

    (None, ApiKeySource::Missing)
}

/// Build launch arguments suitable for reproduction/logging.
pub fn build_launch_args(transport: TransportMode, config: &Path) -> Vec<String> {
    vec![
        format!("--transport={}", transport.as_str()),
        format!("--config={}", config.display()),
    ]
}

fn normalize_api_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
