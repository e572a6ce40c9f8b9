use serde::Deserialize;

use crate::domain::agent::{AgentDescriptor, Workspace};
use crate::domain::query_rewriter::{DataSourceUids, PlaceholderToken};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub grafana: GrafanaSettings,
    pub datasources: DataSourceSettings,
    pub templates: TemplateSettings,
    pub local: LocalSettings,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaSettings {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub folder_uid: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceSettings {
    pub relational_uid: String,
    pub time_series_uid: String,
}

impl From<DataSourceSettings> for DataSourceUids {
    fn from(settings: DataSourceSettings) -> Self {
        Self {
            relational: settings.relational_uid,
            time_series: settings.time_series_uid,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSettings {
    pub base: String,
    pub agent_block: String,
    #[serde(default)]
    pub local_block: Option<String>,
    pub placeholder: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalSettings {
    pub uid: String,
    pub title: String,
    pub label: String,
    pub network_id: String,
}

impl LocalSettings {
    pub fn agent(&self) -> AgentDescriptor {
        AgentDescriptor::new(self.label.clone(), self.network_id.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceSettings {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub agents: Vec<AgentSettings>,
}

impl WorkspaceSettings {
    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.id, self.name.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentSettings {
    pub label: String,
    pub network_id: String,
}

impl From<&AgentSettings> for AgentDescriptor {
    fn from(settings: &AgentSettings) -> Self {
        AgentDescriptor::new(settings.label.clone(), settings.network_id.clone())
    }
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.bind", "0.0.0.0:4000")?
        .set_default("grafana.url", "http://localhost:3000")?
        .set_default("grafana.token", "")?
        .set_default("grafana.timeout_secs", 10)?
        .set_default("datasources.relational_uid", "postgres-events")?
        .set_default("datasources.time_series_uid", "prometheus-metrics")?
        .set_default("templates.base", "templates/base-meta.json")?
        .set_default("templates.agent_block", "templates/row-agent.json")?
        .set_default("templates.local_block", "templates/row-local.json")?
        .set_default("templates.placeholder", PlaceholderToken::DEFAULT)?
        .set_default("local.uid", "monitor-local")?
        .set_default("local.title", "Monitor – Local")?
        .set_default("local.label", "Local")?
        .set_default("local.network_id", "local-master")
}

/// Load `config/monitor.*` (optional) overlaid with `MONITOR__*` env vars.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("MONITOR")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
