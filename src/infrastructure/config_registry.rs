// Agent registry backed by the workspaces listed in configuration
use crate::application::agent_registry::AgentRegistry;
use crate::domain::agent::{AgentDescriptor, Workspace};
use crate::infrastructure::config::WorkspaceSettings;
use anyhow::Result;
use async_trait::async_trait;

/// Workspaces in configuration order; each agent list is in registration
/// order.
#[derive(Debug, Clone, Default)]
pub struct ConfigAgentRegistry {
    entries: Vec<(Workspace, Vec<AgentDescriptor>)>,
}

impl ConfigAgentRegistry {
    pub fn new(workspaces: &[WorkspaceSettings]) -> Self {
        Self::from_entries(
            workspaces
                .iter()
                .map(|ws| (ws.workspace(), ws.agents.iter().map(Into::into).collect()))
                .collect(),
        )
    }

    pub fn from_entries(entries: Vec<(Workspace, Vec<AgentDescriptor>)>) -> Self {
        Self { entries }
    }

    fn find(&self, workspace_id: i64) -> Option<&(Workspace, Vec<AgentDescriptor>)> {
        self.entries.iter().find(|(ws, _)| ws.id == workspace_id)
    }
}

#[async_trait]
impl AgentRegistry for ConfigAgentRegistry {
    async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        Ok(self.entries.iter().map(|(ws, _)| ws.clone()).collect())
    }

    async fn get_workspace(&self, workspace_id: i64) -> Result<Option<Workspace>> {
        Ok(self.find(workspace_id).map(|(ws, _)| ws.clone()))
    }

    async fn list_agents(&self, workspace_id: i64) -> Result<Vec<AgentDescriptor>> {
        Ok(self
            .find(workspace_id)
            .map(|(_, agents)| agents.clone())
            .unwrap_or_default())
    }
}
