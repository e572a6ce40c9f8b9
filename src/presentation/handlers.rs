// HTTP request handlers
use crate::application::monitor_service::MonitorEmbed;
use crate::domain::agent::{AgentDescriptor, Workspace};
use crate::domain::embed::EmbedOptions;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Workspace>>, ApiError> {
    Ok(Json(state.monitor_service.list_workspaces().await?))
}

/// Agents of a workspace in registration (dashboard) order
pub async fn list_agents(
    Path(workspace_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AgentDescriptor>>, ApiError> {
    Ok(Json(state.monitor_service.list_agents(workspace_id).await?))
}

/// Rebuild the workspace dashboard and return where to embed it
pub async fn reconcile_workspace(
    Path(workspace_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MonitorEmbed>, ApiError> {
    let options = embed_options(&body)?;
    let embed = state
        .monitor_service
        .reconcile_workspace(workspace_id, &options)
        .await?;
    Ok(Json(embed))
}

/// Rebuild the fixed-uid local dashboard
pub async fn reconcile_local(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MonitorEmbed>, ApiError> {
    let options = embed_options(&body)?;
    Ok(Json(state.monitor_service.reconcile_local(&options).await?))
}

/// An empty body means "no embed options"; anything else must parse.
fn embed_options(body: &[u8]) -> Result<EmbedOptions, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(EmbedOptions::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}
