use rmcp::model::ErrorData;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::lib::errors::ToolErrorDescriptor;

const INVALID_URL_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "INVALID_URL",
    "url must be a syntactically valid absolute URL",
    "Pass a full URL including its scheme, e.g. https://example.com/page.",
);

/// Proxy pool requested from the scraping service for every call.
pub const RESIDENTIAL_PROXY: &str = "Residential";

/// Output format requested from the scraping service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResponseFormat {
    #[serde(rename = "HTML")]
    Html,
    Markdown,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Html => "HTML",
            ResponseFormat::Markdown => "Markdown",
        }
    }

    /// MIME type reported on the tool result for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ResponseFormat::Html => "text/html",
            ResponseFormat::Markdown => "text/markdown",
        }
    }
}

/// Input for `scrape_url_html` and `scrape_url_markdown`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeUrlRequest {
    /// The URL to scrape.
    pub url: String,
}

impl ScrapeUrlRequest {
    /// Validate the input before any network call is attempted.
    pub fn validate(&self) -> Result<Url, ScrapeUrlValidationError> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(ScrapeUrlValidationError::MissingUrl);
        }
        Url::parse(raw).map_err(|source| ScrapeUrlValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: source.to_string(),
        })
    }
}

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeUrlValidationError {
    #[error("url is required")]
    MissingUrl,
    #[error("url `{url}` is not a valid absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub fn validation_error_to_error_data(err: ScrapeUrlValidationError) -> ErrorData {
    INVALID_URL_ERROR.invalid_params(false, json!({ "details": err.to_string() }))
}

/// JSON body posted to the scrape endpoint. Browser rendering, captcha
/// solving, dialog acceptance, and the residential proxy pool are always on;
/// only the URL and the response format vary per invocation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequestBody {
    pub url: String,
    pub use_browser: bool,
    pub solve_captchas: bool,
    pub accept_dialogs: bool,
    pub proxy_type: &'static str,
    pub response_format: ResponseFormat,
}

impl ScrapeRequestBody {
    pub fn new(url: &str, format: ResponseFormat) -> Self {
        Self {
            url: url.to_string(),
            use_browser: true,
            solve_captchas: true,
            accept_dialogs: true,
            proxy_type: RESIDENTIAL_PROXY,
            response_format: format,
        }
    }
}
