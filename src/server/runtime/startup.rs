use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Error};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use rmcp::{
    transport::{
        streamable_http_server::{
            session::local::LocalSessionManager, tower::StreamableHttpService,
        },
        StreamableHttpServerConfig,
    },
    ServiceExt,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt as _;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    cli::{LaunchProfile, TransportMode},
    lib::telemetry::{emit_runtime_mode, RuntimeModeTelemetry},
    server::{
        config::ServerConfig,
        runtime::{build_instructions, ScrapeServer},
        session::SessionConfig,
    },
    tools::scrape::ScrapeClient,
};

/// Path serving all MCP traffic in HTTP mode, regardless of method.
pub const MCP_PATH: &str = "/mcp";

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }
}

/// Start the MCP server and select stdio/HTTP based on the launch profile.
pub async fn run_server(profile: LaunchProfile, config: ServerConfig) -> Result<(), RuntimeExit> {
    let scrapi = config
        .scrapi
        .with_override(profile.api_key_override.as_deref());
    let invoker = Arc::new(ScrapeClient::new(&scrapi).map_err(RuntimeExit::from_error)?);
    let instructions = build_instructions(&profile, &config);

    emit_runtime_mode(&RuntimeModeTelemetry {
        transport: profile.transport.as_str(),
        host: Some(config.server.host.as_str()),
        port: Some(config.server.port),
        config_path: config.source_path.to_string_lossy().as_ref(),
        endpoint: scrapi.endpoint.as_str(),
        api_key_source: profile.api_key_source.as_str(),
        instructions: &instructions,
        launch_args: &profile.launch_args,
    });

    match profile.transport {
        TransportMode::Stdio => run_stdio(invoker, instructions).await,
        TransportMode::Http => run_http(invoker, instructions, &config).await,
    }
}

/// One long-lived server on stdin/stdout. There is no per-connection
/// configuration channel here, so every invocation runs under the
/// process-wide default key.
async fn run_stdio(invoker: Arc<ScrapeClient>, instructions: String) -> Result<(), RuntimeExit> {
    let api_key = invoker.default_api_key().to_string();
    let server = ScrapeServer::new(invoker, api_key, instructions);
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(RuntimeExit::from_error)?;
    running.waiting().await.map_err(RuntimeExit::from_error)?;
    Ok(())
}

async fn run_http(
    invoker: Arc<ScrapeClient>,
    instructions: String,
    config: &ServerConfig,
) -> Result<(), RuntimeExit> {
    let state = HttpAppState::new(invoker, instructions);
    let app = build_http_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind HTTP port {addr}"))
        .map_err(RuntimeExit::from_error)?;
    tracing::info!(
        target: "scrapi_mcp::runtime",
        transport = "http",
        bind_addr = %addr,
        "Started listening in HTTP mode"
    );

    axum::serve(listener, app)
        .await
        .map_err(RuntimeExit::from_error)
}

/// Read-only state shared by every inbound HTTP request.
#[derive(Clone)]
pub struct HttpAppState {
    invoker: Arc<ScrapeClient>,
    instructions: Arc<String>,
}

impl HttpAppState {
    pub fn new(invoker: Arc<ScrapeClient>, instructions: String) -> Self {
        Self {
            invoker,
            instructions: Arc::new(instructions),
        }
    }
}

/// The `/mcp` router with the CORS policy MCP web clients expect: any
/// origin, and the protocol's session/version headers allowed and exposed.
pub fn build_http_router(state: HttpAppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("mcp-session-id"),
        ])
        .expose_headers([
            HeaderName::from_static("mcp-session-id"),
            HeaderName::from_static("mcp-protocol-version"),
        ]);

    Router::new()
        .route(MCP_PATH, any(handle_mcp))
        .with_state(state)
        .layer(cors)
}

async fn handle_mcp(State(state): State<HttpAppState>, request: Request) -> Response {
    match serve_single_request(state, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                target: "scrapi_mcp::runtime",
                error = %err,
                "Failed to handle MCP request"
            );
            internal_error_response()
        }
    }
}

/// One request/response exchange: parse the session configuration, construct
/// a fresh server and a fresh stateless transport for this cycle only, and
/// let the transport consume the request. No session id is issued and
/// nothing survives the exchange; concurrent requests stay isolated by
/// construction.
async fn serve_single_request(
    state: HttpAppState,
    request: Request,
) -> Result<Response, anyhow::Error> {
    let session = SessionConfig::from_query(request.uri().query())?;
    let api_key = session.resolve_api_key(state.invoker.default_api_key());
    let server = ScrapeServer::new(
        Arc::clone(&state.invoker),
        api_key,
        (*state.instructions).clone(),
    );

    let mut transport_config = StreamableHttpServerConfig::default();
    transport_config.stateful_mode = false;
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        transport_config,
    );

    let response = service.oneshot(request).await?;
    Ok(response.map(Body::new))
}

/// JSON-RPC internal-error reply used when setup fails before the transport
/// has taken over the exchange.
fn internal_error_response() -> Response {
    let body = json!({
        "jsonrpc": "2.0",
        "error": { "code": -32603, "message": "Internal server error" },
        "id": null,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
