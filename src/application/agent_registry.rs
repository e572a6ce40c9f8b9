// Repository trait for workspace and agent lookups
use crate::domain::agent::{AgentDescriptor, Workspace};
use async_trait::async_trait;

#[async_trait]
pub trait AgentRegistry: Send + Sync {
    /// All registered workspaces
    async fn list_workspaces(&self) -> anyhow::Result<Vec<Workspace>>;

    async fn get_workspace(&self, workspace_id: i64) -> anyhow::Result<Option<Workspace>>;

    /// Agents of a workspace, in registration order
    async fn list_agents(&self, workspace_id: i64) -> anyhow::Result<Vec<AgentDescriptor>>;
}
