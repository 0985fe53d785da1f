//! JSON HTTP adapter.
//!
//! A thin axum layer over [`ToolRouter`]: handlers translate HTTP requests
//! into router calls and router outcomes into status codes. No engine logic
//! lives here.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/tools/list` | Every tool with its parameter schema |
//! | `POST` | `/tools/{name}` | Call a tool; the JSON body is its arguments |
//! | `GET`  | `/resources/list` | Every addressable resource |
//! | `GET`  | `/resources/read?uri=…` | Raw resource body |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Tool and resource errors are returned with the router's structured body:
//!
//! ```json
//! { "error": "invalid_color", "message": "invalid color: 'nope'", "hint": "Supported notations: …" }
//! ```
//!
//! `not_found`, `unknown_component` and `unknown_tool` map to 404; every other
//! code maps to 400.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::DesignError;
use crate::models::ResourceInfo;
use crate::router::{ToolResponse, ToolRouter};
use crate::tools::ToolInfo;

/// Starts the HTTP server on `[server].bind`.
///
/// Runs until the process is terminated. The analytics flush task is started
/// when `[analytics].flush_interval_secs` is non-zero.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let router = Arc::new(ToolRouter::from_config(config)?);
    spawn_analytics_flush(&router, config);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");
    serve(listener, router).await
}

/// Serve the API on an already-bound listener.
pub async fn serve(listener: TcpListener, router: Arc<ToolRouter>) -> anyhow::Result<()> {
    axum::serve(listener, build_router(router)).await?;
    Ok(())
}

/// Start the periodic analytics flush if configured.
pub fn spawn_analytics_flush(router: &ToolRouter, config: &Config) {
    let secs = config.analytics.flush_interval_secs;
    if secs > 0 {
        Arc::clone(router.analytics()).spawn_flush_task(Duration::from_secs(secs));
    }
}

/// The axum application, without a listener.
pub fn build_router(router: Arc<ToolRouter>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/resources/list", get(handle_list_resources))
        .route("/resources/read", get(handle_read_resource))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(router)
}

// ============ Error response ============

/// Converts a [`DesignError`] into an HTTP response with its structured body.
struct AppError(DesignError);

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.0.to_json())).into_response()
    }
}

impl From<DesignError> for AppError {
    fn from(e: DesignError) -> Self {
        Self(e)
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(router): State<Arc<ToolRouter>>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: router.list_tools(),
    })
}

// ============ POST /tools/{name} ============

/// Returns `{"result": …, "preview"?: …}` on success, or the structured error
/// with a 400/404 status.
async fn handle_tool_call(
    State(router): State<Arc<ToolRouter>>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    match router.handle_tool_call(&name, &params) {
        ToolResponse::Failure(e) => Err(AppError(e)),
        ok => Ok(Json(ok.to_json())),
    }
}

// ============ Resources ============

#[derive(Serialize)]
struct ResourceListResponse {
    resources: Vec<ResourceInfo>,
}

async fn handle_list_resources(
    State(router): State<Arc<ToolRouter>>,
) -> Json<ResourceListResponse> {
    Json(ResourceListResponse {
        resources: router.list_resources(),
    })
}

#[derive(Deserialize)]
struct ReadParams {
    uri: String,
}

async fn handle_read_resource(
    State(router): State<Arc<ToolRouter>>,
    Query(params): Query<ReadParams>,
) -> Result<Response, AppError> {
    let body = router.read_resource(&params.uri)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
