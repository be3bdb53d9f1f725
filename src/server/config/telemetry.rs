use tracing::{debug, info};

use super::{default_api_key, ServerConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "scrapi_mcp::config",
            path = %path.display(),
            "Loading configuration using MCP_CONFIG_PATH environment variable"
        );
    } else {
        debug!(
            target: "scrapi_mcp::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "MCP_CONFIG_PATH not set; using default config.toml"
        );
    }
}

pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "scrapi_mcp::config",
        path = %config.source_path.display(),
        host = %config.server.host,
        port = config.server.port,
        endpoint = %config.scrapi.endpoint,
        timeout_secs = config.scrapi.timeout_secs,
        api_key_is_default = config.scrapi.api_key == default_api_key(),
        "Configuration loaded"
    );
}
