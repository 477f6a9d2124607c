//! HTTP server: JSON tool API, resource and prompt endpoints, and the MCP
//! Streamable HTTP endpoint.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/tools/list` | All registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call a tool by name |
//! | `GET`  | `/resources/list` | All `resume://` resources |
//! | `GET`  | `/resources/read?uri=` | Text of one resource |
//! | `GET`  | `/prompts/list` | Prompt templates and their arguments |
//! | `POST` | `/prompts/{name}` | Render a prompt |
//! | `*`    | `/mcp` | MCP JSON-RPC over Streamable HTTP |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "question must not be empty" } }
//! ```
//!
//! Codes: `bad_request` (400), `not_found` (404), `parse_failure` (422),
//! `tool_error` (500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use resume_harness_core::TenureError;

use crate::analytics::QueryLog;
use crate::config::Config;
use crate::mcp::McpBridge;
use crate::params::validate_params;
use crate::prompts::{find_prompt, prompts, PromptArgument, RenderedPrompt};
use crate::resources::{list_resources, read_resource, ResourceInfo};
use crate::store::load_document;
use crate::traits::{ToolContext, ToolInfo, ToolRegistry};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub ctx: ToolContext,
    pub tools: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(ctx: ToolContext, tools: ToolRegistry) -> Self {
        Self {
            ctx,
            tools: Arc::new(tools),
        }
    }
}

/// Load the résumé, build the built-in tool set and serve until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let doc = load_document(config)?;
    let ctx = ToolContext::new(
        Arc::new(config.clone()),
        Arc::new(doc),
        Arc::new(QueryLog::new()),
    );
    let state = AppState::new(ctx, ToolRegistry::with_builtins());

    for t in state.tools.tools() {
        tracing::debug!(tool = t.name(), "registered tool");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "server listening (MCP endpoint at /mcp)");
    axum::serve(listener, app).await?;

    Ok(())
}

/// All routes, with CORS open to any origin.
pub fn build_router(state: AppState) -> Router {
    let bridge = McpBridge::new(state.ctx.clone(), state.tools.clone());
    let mcp = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/resources/list", get(handle_list_resources))
        .route("/resources/read", get(handle_read_resource))
        .route("/prompts/list", get(handle_list_prompts))
        .route("/prompts/{name}", post(handle_get_prompt))
        .nest_service("/mcp", mcp)
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn app_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> AppError {
    AppError {
        status,
        code,
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    app_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    app_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Map a tool failure to a status. Tenure parse failures are the caller's
/// data problem (422); empty required inputs are 400; the rest are 500.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    let msg = format!("{}: {}", tool_name, err);

    if let Some(TenureError::ParseFailure { .. }) = err.downcast_ref::<TenureError>() {
        return app_error(StatusCode::UNPROCESSABLE_ENTITY, "parse_failure", msg);
    }
    if err.to_string().contains("must not be empty") {
        return bad_request(msg);
    }
    app_error(StatusCode::INTERNAL_SERVER_ERROR, "tool_error", msg)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ Tools ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: state.tools.infos(),
    })
}

async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let params = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| bad_request(e.to_string()))?;

    let result = tool.execute(params, &state.ctx).await.map_err(|e| {
        tracing::warn!(tool = %name, error = %e, "tool call failed");
        classify_tool_error(&name, e)
    })?;

    Ok(Json(serde_json::json!({ "result": result })))
}

// ============ Resources ============

#[derive(Serialize)]
struct ResourceListResponse {
    resources: Vec<ResourceInfo>,
}

async fn handle_list_resources(State(state): State<AppState>) -> Json<ResourceListResponse> {
    Json(ResourceListResponse {
        resources: list_resources(state.ctx.doc()),
    })
}

#[derive(Deserialize)]
struct ReadParams {
    uri: Option<String>,
}

#[derive(Serialize)]
struct ResourceText {
    uri: String,
    text: String,
}

async fn handle_read_resource(
    State(state): State<AppState>,
    Query(params): Query<ReadParams>,
) -> Result<Json<ResourceText>, AppError> {
    let uri = params
        .uri
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| bad_request("uri must not be empty"))?;
    let text = read_resource(state.ctx.doc(), &uri).map_err(|e| not_found(e.to_string()))?;
    Ok(Json(ResourceText { uri, text }))
}

// ============ Prompts ============

#[derive(Serialize)]
struct PromptInfo {
    name: &'static str,
    description: &'static str,
    arguments: &'static [PromptArgument],
}

#[derive(Serialize)]
struct PromptListResponse {
    prompts: Vec<PromptInfo>,
}

async fn handle_list_prompts() -> Json<PromptListResponse> {
    Json(PromptListResponse {
        prompts: prompts()
            .iter()
            .map(|p| PromptInfo {
                name: p.name,
                description: p.description,
                arguments: p.arguments,
            })
            .collect(),
    })
}

async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Map<String, Value>>>,
) -> Result<Json<RenderedPrompt>, AppError> {
    let template = find_prompt(&name).ok_or_else(|| not_found(format!("no prompt registered with name: {}", name)))?;
    let args = body.map(|Json(m)| m).unwrap_or_default();
    let rendered = template
        .render(state.ctx.doc(), &args)
        .map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(rendered))
}
