// Agent and workspace domain models
use serde::{Deserialize, Serialize};

/// A registered agent as seen by the dashboard reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub label: String,
    /// Address substituted into every query of the agent's block.
    pub network_id: String,
}

impl AgentDescriptor {
    pub fn new(label: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            network_id: network_id.into(),
        }
    }

    /// Title of the section header opening this agent's block.
    pub fn block_title(&self) -> String {
        format!("{}({})", self.label, self.network_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
}

impl Workspace {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn dashboard_title(&self) -> String {
        format!("Monitor – {}", self.name)
    }

    pub fn change_message(&self) -> String {
        format!("reconcile ws={}", self.id)
    }
}
