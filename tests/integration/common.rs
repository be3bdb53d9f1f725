use std::{io, path::PathBuf, process::Stdio, sync::Arc};

use anyhow::{Context, Result};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, ClientInfo},
    serve_client,
    service::ServiceError,
    ServiceExt,
};
use serde_json::Value;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadBuf},
    process::{Child, ChildStdin, ChildStdout, Command},
    task::JoinHandle,
};

use scrapi_mcp::{
    server::{config::ScrapiSection, runtime::ScrapeServer},
    tools::scrape::ScrapeClient,
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_scrapi-mcp");
pub const DEFAULT_TEST_KEY: &str = "99999999-0000-0000-0000-000000000000";

/// ScrAPI section pointed at a test endpoint with a short attempt timeout.
pub fn test_scrapi_section(endpoint: String) -> ScrapiSection {
    ScrapiSection {
        api_key: DEFAULT_TEST_KEY.into(),
        endpoint,
        timeout_secs: 1,
    }
}

pub fn build_server(scrapi: &ScrapiSection, session_api_key: &str) -> Result<ScrapeServer> {
    let invoker = Arc::new(ScrapeClient::new(scrapi).context("failed to build scrape client")?);
    Ok(build_server_with_invoker(invoker, session_api_key))
}

pub fn build_server_with_invoker(
    invoker: Arc<ScrapeClient>,
    session_api_key: &str,
) -> ScrapeServer {
    ScrapeServer::new(
        invoker,
        session_api_key.to_string(),
        "scrape-integration".into(),
    )
}

/// Drive one tool call through a real client/server pair over an in-memory
/// duplex transport, then tear both down.
pub async fn call_tool(
    server: ScrapeServer,
    tool: &str,
    arguments: Value,
) -> Result<Result<CallToolResult, ServiceError>> {
    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server_task = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        Result::<_, anyhow::Error>::Ok(())
    });
    let client = serve_client(ClientInfo::default(), client_transport).await?;

    let response = client
        .call_tool(CallToolRequestParam {
            name: tool.to_string().into(),
            arguments: arguments.as_object().cloned(),
        })
        .await;

    let _ = client.cancel().await;
    let _ = server_task.await;
    Ok(response)
}

pub async fn spawn_server_process() -> Result<(Child, ChildIoBridge, Option<JoinHandle<()>>)> {
    let mut command = Command::new(BINARY_PATH);
    command
        .env(
            "MCP_CONFIG_PATH",
            fixture("tests/fixtures/config_valid.toml"),
        )
        .env("MCP_TRANSPORT", "stdio")
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().context("failed to spawn server process")?;
    let stdout = child.stdout.take().expect("child stdout");
    let stdin = child.stdin.take().expect("child stdin");
    let bridge = ChildIoBridge::new(stdout, stdin);
    let stderr_handle = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
        })
    });
    Ok((child, bridge, stderr_handle))
}

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join(relative).display().to_string()
}

pub struct ChildIoBridge {
    stdout: ChildStdout,
    stdin: ChildStdin,
}

impl ChildIoBridge {
    pub fn new(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self { stdout, stdin }
    }
}

impl AsyncRead for ChildIoBridge {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ChildIoBridge {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        data: &[u8],
    ) -> std::task::Poll<io::Result<usize>> {
        std::pin::Pin::new(&mut self.stdin).poll_write(cx, data)
    }

    fn poll_flush(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<io::Result<()>> {
        std::pin::Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}
