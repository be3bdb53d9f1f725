//! MCP tools for scraping URLs through the ScrAPI service.

pub mod invoker;
pub mod request;

pub use invoker::{
    scrape_error_to_error_data, ScrapeClient, ScrapeError, ScrapeOutcome, API_KEY_HEADER,
};
pub use request::{
    validation_error_to_error_data, ResponseFormat, ScrapeRequestBody, ScrapeUrlRequest,
    ScrapeUrlValidationError, RESIDENTIAL_PROXY,
};

pub const SCRAPE_HTML_TOOL_ID: &str = "scrape_url_html";
pub const SCRAPE_MARKDOWN_TOOL_ID: &str = "scrape_url_markdown";
