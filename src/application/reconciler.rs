// Reconciler - Builds dashboard documents and upserts them to the backend
use crate::application::dashboard_backend::{DashboardBackend, DashboardLocator, UpsertRequest};
use crate::application::error::ReconcileError;
use crate::domain::agent::AgentDescriptor;
use crate::domain::dashboard::{assemble, DashboardDocument, DashboardSpec};
use crate::domain::error::TemplateError;
use crate::domain::layout::BlockStack;
use crate::domain::query_rewriter::QueryRewriter;
use crate::infrastructure::template_store::TemplateSet;
use std::sync::Arc;

const LOCAL_CHANGE_MESSAGE: &str = "reconcile local monitor";
const LOCAL_TAGS: [&str; 2] = ["auto", "local"];

/// The single pseudo-agent shown on the local dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDashboard {
    /// Fixed document uid, so every run overwrites the same dashboard.
    pub uid: String,
    pub agent: AgentDescriptor,
}

impl Default for LocalDashboard {
    fn default() -> Self {
        Self {
            uid: "monitor-local".to_string(),
            agent: AgentDescriptor::new("Local", "local-master"),
        }
    }
}

#[derive(Clone)]
pub struct Reconciler {
    backend: Arc<dyn DashboardBackend>,
    templates: Arc<TemplateSet>,
    rewriter: QueryRewriter,
    local: LocalDashboard,
}

impl Reconciler {
    pub fn new(
        backend: Arc<dyn DashboardBackend>,
        templates: Arc<TemplateSet>,
        rewriter: QueryRewriter,
        local: LocalDashboard,
    ) -> Self {
        Self {
            backend,
            templates,
            rewriter,
            local,
        }
    }

    pub fn backend_url(&self) -> &str {
        self.backend.base_url()
    }

    /// One block per agent, stacked in registration order. The backend
    /// assigns the uid on first creation.
    pub fn build_workspace_dashboard(
        &self,
        agents: &[AgentDescriptor],
        title: &str,
    ) -> Result<DashboardDocument, TemplateError> {
        let mut stack = BlockStack::new();
        for agent in agents {
            let block = self.rewriter.rewrite(self.templates.agent_block(), agent)?;
            stack.push(&block);
        }
        tracing::debug!("Stacked {} agent blocks, {} rows tall", agents.len(), stack.height());
        let panels = stack.finish();

        Ok(assemble(self.templates.skeleton(), DashboardSpec::new(title, panels)))
    }

    pub fn build_local_dashboard(&self, title: &str) -> Result<DashboardDocument, TemplateError> {
        let block = self.rewriter.rewrite(self.templates.local_block(), &self.local.agent)?;
        let mut stack = BlockStack::new();
        stack.push(&block);

        let spec = DashboardSpec::new(title, stack.finish())
            .with_uid(self.local.uid.clone())
            .with_tags(LOCAL_TAGS);
        Ok(assemble(self.templates.skeleton(), spec))
    }

    pub async fn reconcile_for_workspace(
        &self,
        agents: &[AgentDescriptor],
        title: &str,
        message: &str,
    ) -> Result<DashboardLocator, ReconcileError> {
        let dashboard = self.build_workspace_dashboard(agents, title)?;
        tracing::info!(
            "Reconciling dashboard '{}' for {} agents ({} panels)",
            title,
            agents.len(),
            dashboard.panels.len()
        );
        self.submit(dashboard, message).await
    }

    pub async fn reconcile_for_local(&self, title: &str) -> Result<DashboardLocator, ReconcileError> {
        let dashboard = self.build_local_dashboard(title)?;
        tracing::info!("Reconciling local dashboard '{}' (uid {})", title, self.local.uid);
        self.submit(dashboard, LOCAL_CHANGE_MESSAGE).await
    }

    async fn submit(
        &self,
        dashboard: DashboardDocument,
        message: &str,
    ) -> Result<DashboardLocator, ReconcileError> {
        let response = self
            .backend
            .upsert(UpsertRequest::overwrite(dashboard, message))
            .await?;
        tracing::info!("Dashboard {} available at {}", response.uid, response.url);
        Ok(response.into())
    }
}
