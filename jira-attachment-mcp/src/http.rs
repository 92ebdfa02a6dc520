//! HTTP surface for bulk attachment downloads
//!
//! A small axum router for deployments without an MCP client. It exposes a
//! health root and an endpoint that stages every attachment of an issue and
//! answers with a per-file result list.

use crate::attachment_sync::{AttachmentSync, BulkDownloadReport};
use crate::config::JiraConfig;
use crate::error::JiraMcpError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared state of the HTTP surface
#[derive(Clone)]
pub struct HttpState {
    pub sync: Arc<AttachmentSync>,
    pub config: Arc<JiraConfig>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/download", post(download_default_issue))
        .route("/issues/{issue_key}/download", post(download_issue))
        .with_state(state)
}

/// Serve the router until the listener is closed
pub async fn serve(listener: TcpListener, state: HttpState) -> anyhow::Result<()> {
    info!("HTTP surface listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Jira MCP Server", "status": "running" }))
}

async fn download_default_issue(
    State(state): State<HttpState>,
) -> Result<Json<BulkDownloadReport>, (StatusCode, Json<Value>)> {
    let issue_key = state.config.resolve_issue_key(None).map_err(to_error)?;
    bulk_download(&state, &issue_key).await
}

async fn download_issue(
    State(state): State<HttpState>,
    Path(issue_key): Path<String>,
) -> Result<Json<BulkDownloadReport>, (StatusCode, Json<Value>)> {
    let issue_key = state
        .config
        .resolve_issue_key(Some(&issue_key))
        .map_err(to_error)?;
    bulk_download(&state, &issue_key).await
}

async fn bulk_download(
    state: &HttpState,
    issue_key: &str,
) -> Result<Json<BulkDownloadReport>, (StatusCode, Json<Value>)> {
    state
        .sync
        .download_all_report(issue_key)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Bulk download for {} failed: {}", issue_key, e);
            to_error(e)
        })
}

fn to_error(e: JiraMcpError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        JiraMcpError::MissingIssueKey | JiraMcpError::InvalidParameter { .. } => {
            StatusCode::BAD_REQUEST
        }
        JiraMcpError::RemoteFetch { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "error": e.to_string(), "category": e.category() })),
    )
}
