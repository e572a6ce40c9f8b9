// Template store - Loads the dashboard skeleton and panel block templates
use std::path::Path;

use crate::domain::dashboard::DashboardSkeleton;
use crate::domain::error::TemplateError;
use crate::domain::panel::Panel;
use crate::infrastructure::config::TemplateSettings;

/// Read-only templates every reconciliation starts from.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    skeleton: DashboardSkeleton,
    agent_block: Vec<Panel>,
    local_block: Vec<Panel>,
}

impl TemplateSet {
    pub fn new(
        skeleton: DashboardSkeleton,
        agent_block: Vec<Panel>,
        local_block: Option<Vec<Panel>>,
    ) -> Result<Self, TemplateError> {
        validate_block(&agent_block)?;
        let local_block = match local_block {
            Some(block) => {
                validate_block(&block)?;
                block
            }
            None => agent_block.clone(),
        };
        Ok(Self {
            skeleton,
            agent_block,
            local_block,
        })
    }

    pub fn load(settings: &TemplateSettings) -> Result<Self, TemplateError> {
        let skeleton = parse(&read(&settings.base)?)?;
        let agent_block = parse(&read(&settings.agent_block)?)?;
        let local_block = match &settings.local_block {
            Some(path) if Path::new(path).exists() => Some(parse(&read(path)?)?),
            Some(path) => {
                tracing::warn!("Local block template {} not found, using agent block", path);
                None
            }
            None => None,
        };

        let set = Self::new(skeleton, agent_block, local_block)?;
        tracing::info!(
            "Loaded templates: agent block {} panels, local block {} panels",
            set.agent_block.len(),
            set.local_block.len()
        );
        Ok(set)
    }

    /// Build a set without the integrity checks, to exercise how callers
    /// cope with a broken block.
    #[cfg(test)]
    pub(crate) fn unchecked(skeleton: DashboardSkeleton, agent_block: Vec<Panel>, local_block: Vec<Panel>) -> Self {
        Self {
            skeleton,
            agent_block,
            local_block,
        }
    }

    pub fn skeleton(&self) -> &DashboardSkeleton {
        &self.skeleton
    }

    pub fn agent_block(&self) -> &[Panel] {
        &self.agent_block
    }

    pub fn local_block(&self) -> &[Panel] {
        &self.local_block
    }
}

fn validate_block(block: &[Panel]) -> Result<(), TemplateError> {
    if block.is_empty() {
        return Err(TemplateError::EmptyBlock);
    }
    if !block.iter().any(Panel::is_header) {
        return Err(TemplateError::MissingHeader);
    }
    Ok(())
}

fn read(path: &str) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|e| TemplateError::Unreadable {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn parse<T: serde::de::DeserializeOwned>(source: &str) -> Result<T, TemplateError> {
    serde_json::from_str(source).map_err(|e| TemplateError::Parse(e.to_string()))
}
