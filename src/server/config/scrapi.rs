use std::path::Path;

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::lib::errors::ConfigError;

/// Product name reported to MCP clients and the scraping service.
pub const SERVER_NAME: &str = "ScrAPI MCP Server";
/// Product version reported alongside the name.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Hosted scrape endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.scrapi.tech/v1/scrape";
/// Client-side cap on each outbound scrape attempt, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared limited-usage key applied when no key is configured anywhere.
pub fn default_api_key() -> String {
    Uuid::nil().to_string()
}

/// `User-Agent` identifying this server to the scraping service.
pub fn user_agent() -> String {
    format!("{SERVER_NAME} - {SERVER_VERSION}")
}

/// Upstream scraping service settings.
#[derive(Debug, Clone)]
pub struct ScrapiSection {
    pub api_key: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl ScrapiSection {
    /// Replace the default key with a CLI/environment override.
    pub fn with_override(&self, api_key_override: Option<&str>) -> Self {
        match api_key_override {
            Some(key) => Self {
                api_key: key.to_string(),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawScrapiSection {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub fn parse_scrapi_section(
    raw: Option<RawScrapiSection>,
    path: &Path,
) -> Result<ScrapiSection, ConfigError> {
    let scrapi_raw = raw.unwrap_or_default();

    let api_key = match scrapi_raw.api_key {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidField {
                    path: path.to_path_buf(),
                    field: "scrapi.api_key",
                    message: "Use a non-empty key, or omit the field for default limited usage"
                        .into(),
                });
            }
            trimmed.to_string()
        }
        None => default_api_key(),
    };

    let endpoint = scrapi_raw
        .endpoint
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    if Url::parse(&endpoint).is_err() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "scrapi.endpoint",
            message: format!("`{endpoint}` is not a valid absolute URL"),
        });
    }

    let timeout_secs = scrapi_raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "scrapi.timeout_secs",
            message: "Use a timeout of at least one second".into(),
        });
    }

    Ok(ScrapiSection {
        api_key,
        endpoint,
        timeout_secs,
    })
}
