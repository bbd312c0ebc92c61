//! HTTP transport.
//!
//! - `POST /mcp`: MCP JSON-RPC over plain request/response
//! - `POST /api/research`: run the research pipeline on a JSON request
//! - `GET /health`: liveness probe

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{self, JsonRpcRequest};
use crate::error::AssistantError;
use crate::formatters;
use crate::pipeline::ResearchRequest;
use crate::tools::{McpTool, ToolContext};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub tools: Vec<Box<dyn McpTool>>,
    pub ctx: ToolContext,
}

/// Create the HTTP router.
pub fn create_router(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Router {
    let state = Arc::new(HttpState { tools, ctx });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp_post))
        .route("/api/research", post(handle_research))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.tools.len(),
        "vectorDatabase": state.ctx.store.is_some()
    }))
}

async fn handle_mcp_post(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    tracing::debug!(method = %req.method, "Handling MCP POST request");

    match protocol::dispatch(&req, &state.tools, &state.ctx).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_research(
    State(state): State<Arc<HttpState>>,
    Json(request): Json<ResearchRequest>,
) -> Response {
    if let Err(e) = state.ctx.require_llm() {
        return error_response(&e);
    }

    match state.ctx.pipeline.run(&request).await {
        Ok(report) => Json(formatters::compact_report(&report)).into_response(),
        Err(e) => {
            tracing::error!(topic = %request.topic, error = %e, "Research request failed");
            error_response(&e)
        }
    }
}

fn error_response(err: &AssistantError) -> Response {
    let status = match err {
        AssistantError::Validation { .. } | AssistantError::Serialization(_) => {
            StatusCode::BAD_REQUEST
        }
        AssistantError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AssistantError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    };

    (status, Json(serde_json::json!({ "error": err.to_user_message() }))).into_response()
}
