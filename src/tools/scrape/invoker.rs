use std::time::Duration;

use reqwest::{Client, StatusCode};
use rmcp::model::ErrorData;
use serde_json::json;
use thiserror::Error;

use crate::{
    lib::{errors::ToolErrorDescriptor, telemetry::ScrapeSpan},
    server::config::{self, ScrapiSection},
};

use super::request::{ResponseFormat, ScrapeRequestBody};

const SCRAPE_UNREACHABLE_ERROR: ToolErrorDescriptor = ToolErrorDescriptor::new(
    "SCRAPE_UNREACHABLE",
    "The scraping service could not be reached",
    "Check network connectivity and the configured endpoint, then retry.",
);

/// Header carrying the API key to the scraping service.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Result of one scrape invocation, shaped for the tool layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Upstream answered with a success status; body relayed verbatim.
    Success {
        mime_type: &'static str,
        body: String,
    },
    /// Upstream answered with an error status; body relayed verbatim.
    Rejected { status: StatusCode, body: String },
}

/// Transport-level failure after the one-shot default-key retry was spent.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scrape request to {endpoint} failed after retrying with the default API key: {source}")]
    RetryExhausted {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

pub fn scrape_error_to_error_data(err: &ScrapeError) -> ErrorData {
    SCRAPE_UNREACHABLE_ERROR.internal_error(true, json!({ "details": err.to_string() }))
}

/// Issues outbound calls to the ScrAPI scrape endpoint.
///
/// Holds the only shared resources of the process: the pooled HTTP client,
/// the endpoint, and the process-wide default API key. All of them are
/// read-only after construction; the key for a given call travels as an
/// argument.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    http: Client,
    endpoint: String,
    default_api_key: String,
}

impl ScrapeClient {
    pub fn new(scrapi: &ScrapiSection) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(config::user_agent())
            .timeout(Duration::from_secs(scrapi.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: scrapi.endpoint.clone(),
            default_api_key: scrapi.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_api_key(&self) -> &str {
        &self.default_api_key
    }

    /// One scrape invocation.
    ///
    /// A completed HTTP exchange is always an `Ok` outcome, success status or
    /// not. Only a failure before a status is available (connect error, DNS,
    /// timeout, truncated body) triggers the retry: exactly one further
    /// attempt, forced to the process-wide default key no matter which key
    /// the first attempt used. A caller key broken enough to kill the
    /// transport must not strand the call; the trade-off is intentional and
    /// applies to unrelated network blips as well. The second attempt gets
    /// no safety net.
    pub async fn scrape(
        &self,
        url: &str,
        format: ResponseFormat,
        api_key: &str,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        let span = ScrapeSpan::start(url, format.as_str());
        match self.attempt(url, format, api_key).await {
            Ok(outcome) => {
                span.finish(outcome.status_label(), outcome.http_status());
                Ok(outcome)
            }
            Err(first_err) => {
                tracing::warn!(
                    target: "scrapi_mcp::scrape",
                    url = url,
                    format = format.as_str(),
                    error = %first_err,
                    "Scrape attempt failed before an upstream status; retrying once with the default API key"
                );
                match self.attempt(url, format, &self.default_api_key).await {
                    Ok(outcome) => {
                        span.finish(outcome.status_label(), outcome.http_status());
                        Ok(outcome)
                    }
                    Err(source) => {
                        span.finish("transport_error", None);
                        Err(ScrapeError::RetryExhausted {
                            endpoint: self.endpoint.clone(),
                            source,
                        })
                    }
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        format: ResponseFormat,
        api_key: &str,
    ) -> Result<ScrapeOutcome, reqwest::Error> {
        let response = self
            .http
            .post(self.endpoint.as_str())
            .header(API_KEY_HEADER, api_key)
            .json(&ScrapeRequestBody::new(url, format))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(ScrapeOutcome::Success {
                mime_type: format.mime_type(),
                body,
            })
        } else {
            Ok(ScrapeOutcome::Rejected { status, body })
        }
    }
}

impl ScrapeOutcome {
    fn status_label(&self) -> &'static str {
        match self {
            ScrapeOutcome::Success { .. } => "success",
            ScrapeOutcome::Rejected { .. } => "rejected",
        }
    }

    fn http_status(&self) -> Option<u16> {
        match self {
            ScrapeOutcome::Success { .. } => None,
            ScrapeOutcome::Rejected { status, .. } => Some(status.as_u16()),
        }
    }
}
