// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::monitor_service::MonitorService;
use crate::application::reconciler::{LocalDashboard, Reconciler};
use crate::domain::query_rewriter::{PlaceholderToken, QueryRewriter};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::config_registry::ConfigAgentRegistry;
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::infrastructure::template_store::TemplateSet;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;

    // Templates are read once and shared read-only by every reconciliation
    let templates = TemplateSet::load(&config.templates).context("Failed to load dashboard templates")?;
    let placeholder = PlaceholderToken::new(config.templates.placeholder.clone())?;
    tracing::debug!("Agent placeholder token: {}", placeholder.as_str());
    let rewriter = QueryRewriter::new(placeholder, config.datasources.clone().into());

    // Adapters (infrastructure layer)
    let grafana = Arc::new(GrafanaClient::new(
        config.grafana.url.clone(),
        config.grafana.token.clone(),
        config.grafana.folder_uid.clone(),
        Duration::from_secs(config.grafana.timeout_secs),
    )?);
    let registry = Arc::new(ConfigAgentRegistry::new(&config.workspaces));

    // Services (application layer)
    let reconciler = Reconciler::new(
        grafana,
        Arc::new(templates),
        rewriter,
        LocalDashboard {
            uid: config.local.uid.clone(),
            agent: config.local.agent(),
        },
    );
    let monitor_service = MonitorService::new(registry, reconciler, config.local.title.clone());

    let state = Arc::new(AppState { monitor_service });
    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(
        "Starting compss-monitor on {} ({} workspaces, grafana {})",
        addr,
        config.workspaces.len(),
        config.grafana.url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
