use std::sync::Arc;

use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, ErrorData, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::json;

use crate::tools::{
    self,
    scrape::{
        scrape_error_to_error_data, validation_error_to_error_data, ResponseFormat, ScrapeClient,
        ScrapeOutcome, ScrapeUrlRequest,
    },
    ServerToolRouter,
};

/// One MCP server session: the shared invoker plus the API key resolved for
/// this session. Constructed once for the lifetime of a stdio process, or
/// freshly per inbound request in HTTP mode.
#[derive(Clone)]
pub struct ScrapeServer {
    invoker: Arc<ScrapeClient>,
    api_key: Arc<str>,
    instructions: Arc<String>,
    tool_router: ServerToolRouter<Self>,
}

impl ScrapeServer {
    pub fn new(invoker: Arc<ScrapeClient>, api_key: String, instructions: String) -> Self {
        let router = tools::build_router(Self::tool_router);
        Self {
            invoker,
            api_key: api_key.into(),
            instructions: Arc::new(instructions),
            tool_router: router,
        }
    }

    /// Shared handler behind both tools; only the format differs.
    async fn scrape(
        &self,
        request: ScrapeUrlRequest,
        format: ResponseFormat,
    ) -> Result<CallToolResult, ErrorData> {
        // Validation only; the URL string is forwarded untouched so the
        // scraping service sees exactly what the caller asked for.
        request.validate().map_err(validation_error_to_error_data)?;

        let invoker = Arc::clone(&self.invoker);
        let api_key = Arc::clone(&self.api_key);
        let url = request.url.trim().to_string();

        // Detached so a closed connection does not abort an in-flight
        // scrape; the call runs to completion or timeout and its result is
        // simply discarded.
        let outcome =
            tokio::spawn(async move { invoker.scrape(&url, format, &api_key).await })
                .await
                .map_err(|err| ErrorData::internal_error(err.to_string(), None))?;

        match outcome {
            Ok(ScrapeOutcome::Success { mime_type, body }) => {
                Ok(CallToolResult::success(vec![mime_tagged_text(
                    &body, mime_type,
                )]))
            }
            Ok(ScrapeOutcome::Rejected { body, .. }) => {
                Ok(CallToolResult::error(vec![Content::text(body)]))
            }
            Err(err) => Err(scrape_error_to_error_data(&err)),
        }
    }
}

/// Text content block tagged with the upstream MIME type, the shape the
/// hosted ScrAPI server emits. Protocol models that do not carry a
/// `mimeType` member on text content degrade to a plain text block.
fn mime_tagged_text(body: &str, mime_type: &str) -> Content {
    serde_json::from_value(json!({
        "type": "text",
        "text": body,
        "mimeType": mime_type,
    }))
    .unwrap_or_else(|_| Content::text(body))
}

#[tool_router(router = tool_router)]
impl ScrapeServer {
    #[tool(
        name = "scrape_url_html",
        description = "Use a URL to scrape a website using the ScrAPI service and retrieve the result as HTML. Use this for scraping website content that is difficult to access because of bot detection, captchas or even geolocation restrictions. The result will be in HTML which is preferable if advanced parsing is required."
    )]
    async fn scrape_url_html(
        &self,
        Parameters(request): Parameters<ScrapeUrlRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.scrape(request, ResponseFormat::Html).await
    }

    #[tool(
        name = "scrape_url_markdown",
        description = "Use a URL to scrape a website using the ScrAPI service and retrieve the result as Markdown. Use this for scraping website content that is difficult to access because of bot detection, captchas or even geolocation restrictions. The result will be in Markdown which is preferable if the text content of the webpage is important and not the structural information of the page."
    )]
    async fn scrape_url_markdown(
        &self,
        Parameters(request): Parameters<ScrapeUrlRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.scrape(request, ResponseFormat::Markdown).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ScrapeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }
}
