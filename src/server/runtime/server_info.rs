use crate::{cli::LaunchProfile, server::config::ServerConfig};

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(profile: &LaunchProfile, config: &ServerConfig) -> String {
    format!(
        "Scrapes websites through the ScrAPI service, including pages behind bot detection or captchas. Use scrape_url_html when you need the page structure, scrape_url_markdown when only the text content matters. Running in {transport} mode (config {path}).",
        transport = profile.transport.as_str(),
        path = config.source_path.display()
    )
}
