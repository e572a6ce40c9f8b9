// Route table for the monitor API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_agents, list_workspaces, reconcile_local, reconcile_workspace,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/workspaces", get(list_workspaces))
        .route("/api/workspaces/:workspace_id/agents", get(list_agents))
        .route("/api/monitor/reconcile/:workspace_id", post(reconcile_workspace))
        .route("/api/monitor/local/reconcile", post(reconcile_local))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
