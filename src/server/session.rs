//! Per-session configuration carried on the inbound HTTP request.
//!
//! Callers may supply their own ScrAPI key as a base64-encoded JSON object in
//! the `config` query parameter; everything else falls back to the
//! process-wide defaults resolved at startup.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use thiserror::Error;

/// Query parameter carrying the base64-encoded session configuration.
pub const CONFIG_QUERY_PARAM: &str = "config";

/// Caller-supplied session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// ScrAPI API key for scraping. Absent or blank means default limited
    /// usage under the server's own key.
    pub scrapi_api_key: Option<String>,
}

/// Errors while decoding the `config` query parameter.
#[derive(Debug, Error)]
pub enum SessionConfigError {
    #[error("`config` query parameter is not valid base64: {source}")]
    Decode {
        #[source]
        source: base64::DecodeError,
    },
    #[error("`config` query parameter is not valid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

impl SessionConfig {
    /// Parse the `config` query parameter out of a raw query string, if
    /// present. An absent parameter is an empty configuration, not an error.
    pub fn from_query(query: Option<&str>) -> Result<Self, SessionConfigError> {
        let Some(query) = query else {
            return Ok(Self::default());
        };
        let Some(encoded) = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key.as_ref() == CONFIG_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
        else {
            return Ok(Self::default());
        };

        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|source| SessionConfigError::Decode { source })?;
        serde_json::from_slice(&decoded).map_err(|source| SessionConfigError::Parse { source })
    }

    /// The caller-supplied key when present and non-blank, else the process
    /// default. Key format is not checked locally; the scraping service is
    /// the authority on what a usable key looks like.
    pub fn resolve_api_key(&self, default_api_key: &str) -> String {
        match self.scrapi_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => default_api_key.to_string(),
        }
    }
}
