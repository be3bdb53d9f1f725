use std::time::Duration;

use anyhow::Result;
use rmcp::{model::ClientInfo, serve_client};
use tokio::time::timeout;

use crate::common::spawn_server_process;

#[tokio::test]
async fn inspector_style_spawn_lists_scrape_tools() -> Result<()> {
    let (mut child, transport, stderr_task) = spawn_server_process().await?;

    let client = serve_client(ClientInfo::default(), transport).await?;
    let list = client.list_tools(None).await?;
    for tool in ["scrape_url_html", "scrape_url_markdown"] {
        assert!(
            list.tools.iter().any(|entry| entry.name.as_ref() == tool),
            "list_tools should include {tool}: {:?}",
            list.tools
        );
    }
    assert_eq!(list.tools.len(), 2, "exactly two tools are registered");

    client.cancel().await?;
    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(
        status.success(),
        "server should exit cleanly but exit status was {status:?}"
    );
    if let Some(handle) = stderr_task {
        let _ = handle.await;
    }
    Ok(())
}
