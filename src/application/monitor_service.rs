// Monitor service - Use case behind the monitor endpoints
use crate::application::agent_registry::AgentRegistry;
use crate::application::error::ReconcileError;
use crate::application::reconciler::Reconciler;
use crate::domain::agent::{AgentDescriptor, Workspace};
use crate::domain::embed::{embed_url, EmbedOptions};
use serde::Serialize;
use std::sync::Arc;

/// Result of a reconciliation, ready to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorEmbed {
    pub uid: String,
    pub url: String,
    pub iframe: String,
}

#[derive(Clone)]
pub struct MonitorService {
    registry: Arc<dyn AgentRegistry>,
    reconciler: Reconciler,
    local_title: String,
}

impl MonitorService {
    pub fn new(registry: Arc<dyn AgentRegistry>, reconciler: Reconciler, local_title: String) -> Self {
        Self {
            registry,
            reconciler,
            local_title,
        }
    }

    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, ReconcileError> {
        self.registry
            .list_workspaces()
            .await
            .map_err(|e| ReconcileError::Registry(e.to_string()))
    }

    pub async fn list_agents(&self, workspace_id: i64) -> Result<Vec<AgentDescriptor>, ReconcileError> {
        let workspace = self.workspace(workspace_id).await?;
        self.registry
            .list_agents(workspace.id)
            .await
            .map_err(|e| ReconcileError::Registry(e.to_string()))
    }

    pub async fn reconcile_workspace(
        &self,
        workspace_id: i64,
        options: &EmbedOptions,
    ) -> Result<MonitorEmbed, ReconcileError> {
        let workspace = self.workspace(workspace_id).await?;
        let agents = self
            .registry
            .list_agents(workspace.id)
            .await
            .map_err(|e| ReconcileError::Registry(e.to_string()))?;

        let locator = self
            .reconciler
            .reconcile_for_workspace(&agents, &workspace.dashboard_title(), &workspace.change_message())
            .await?;
        Ok(self.embed(locator.uid, locator.url, options))
    }

    pub async fn reconcile_local(&self, options: &EmbedOptions) -> Result<MonitorEmbed, ReconcileError> {
        let locator = self.reconciler.reconcile_for_local(&self.local_title).await?;
        Ok(self.embed(locator.uid, locator.url, options))
    }

    async fn workspace(&self, workspace_id: i64) -> Result<Workspace, ReconcileError> {
        self.registry
            .get_workspace(workspace_id)
            .await
            .map_err(|e| ReconcileError::Registry(e.to_string()))?
            .ok_or(ReconcileError::WorkspaceNotFound(workspace_id))
    }

    fn embed(&self, uid: String, url: String, options: &EmbedOptions) -> MonitorEmbed {
        let iframe = embed_url(self.reconciler.backend_url(), &url, options);
        MonitorEmbed { uid, url, iframe }
    }
}
