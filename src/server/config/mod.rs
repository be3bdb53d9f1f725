//! Load and validate server configuration.
use std::{env, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod scrapi;
pub mod server;
pub mod telemetry;

pub use scrapi::{
    default_api_key, parse_scrapi_section, user_agent, RawScrapiSection, ScrapiSection,
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, SERVER_NAME, SERVER_VERSION,
};
pub use server::{parse_server_section, RawServerSection, ServerSection, DEFAULT_HOST, DEFAULT_PORT};

const CONFIG_ENV_KEY: &str = "MCP_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub scrapi: ScrapiSection,
    pub source_path: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct RawServerConfig {
    server: Option<RawServerSection>,
    scrapi: Option<RawScrapiSection>,
}

impl ServerConfig {
    /// Prefer `MCP_CONFIG_PATH` if set; otherwise read `config.toml`.
    pub fn load_from_env_or_default() -> Result<Self, ConfigError> {
        let (path, from_env) = match env::var(CONFIG_ENV_KEY) {
            Ok(value) if !value.trim().is_empty() => (PathBuf::from(value), true),
            _ => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        telemetry::log_env_source(&path, from_env);
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// A path that does not exist yields built-in defaults: MCP clients
    /// routinely launch this server with environment-only configuration. A
    /// file that exists but cannot be read or parsed is still an error.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                target: "scrapi_mcp::config",
                path = %path.display(),
                "Configuration file not found; using built-in defaults"
            );
            return Self::from_raw(RawServerConfig::default(), path);
        }

        info!(
            target: "scrapi_mcp::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "scrapi_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawServerConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "scrapi_mcp::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "scrapi_mcp::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawServerConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let server = parse_server_section(raw.server, &path)?;
        let scrapi = parse_scrapi_section(raw.scrapi, &path)?;

        Ok(Self {
            server,
            scrapi,
            source_path: path,
        })
    }
}
