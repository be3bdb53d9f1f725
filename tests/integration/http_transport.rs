use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

use scrapi_mcp::{
    server::{
        config::ScrapiSection,
        runtime::{build_http_router, HttpAppState, MCP_PATH},
    },
    tools::scrape::ScrapeClient,
};

fn test_router() -> Result<Router> {
    // The endpoint is never reached by these tests; transport handling is
    // what is under test here.
    let scrapi = ScrapiSection {
        api_key: "default-key".into(),
        endpoint: "http://127.0.0.1:9/v1/scrape".into(),
        timeout_secs: 1,
    };
    let invoker = Arc::new(ScrapeClient::new(&scrapi).context("failed to build scrape client")?);
    Ok(build_http_router(HttpAppState::new(
        invoker,
        "http-integration".into(),
    )))
}

fn initialize_request(uri: &str) -> Result<Request<Body>> {
    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": { "name": "http-integration", "version": "0.0.0" }
        }
    });
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream")
        .body(Body::from(payload.to_string()))
        .context("failed to build request")
}

async fn read_body(response: axum::response::Response) -> Result<Vec<u8>> {
    let bytes = timeout(Duration::from_secs(5), to_bytes(response.into_body(), usize::MAX))
        .await
        .context("response body was not finished")??;
    Ok(bytes.to_vec())
}

#[tokio::test]
async fn malformed_config_param_yields_json_rpc_internal_error() -> Result<()> {
    let app = test_router()?;
    let uri = format!("{MCP_PATH}?config=!!!not-base64!!!");

    let response = app.oneshot(initialize_request(&uri)?).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&read_body(response).await?)?;
    assert_eq!(body["jsonrpc"], json!("2.0"));
    assert_eq!(body["error"]["code"], json!(-32603));
    assert_eq!(body["id"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn initialize_round_trip_is_self_contained() -> Result<()> {
    let app = test_router()?;

    let response = app.oneshot(initialize_request(MCP_PATH)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().get("mcp-session-id").is_none(),
        "stateless transport must not issue a session id"
    );
    let body = String::from_utf8(read_body(response).await?)?;
    assert!(
        body.contains("protocolVersion"),
        "initialize response should carry a protocol version: {body}"
    );
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_are_served_independently() -> Result<()> {
    let app = test_router()?;

    let (first, second) = tokio::join!(
        app.clone().oneshot(initialize_request(MCP_PATH)?),
        app.oneshot(initialize_request(MCP_PATH)?),
    );

    assert_eq!(first?.status(), StatusCode::OK);
    assert_eq!(second?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn preflight_gets_permissive_cors_headers() -> Result<()> {
    let app = test_router()?;
    let request = Request::builder()
        .method("OPTIONS")
        .uri(MCP_PATH)
        .header("origin", "https://inspector.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type,mcp-session-id")
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}
