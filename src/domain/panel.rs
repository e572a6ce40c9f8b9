// Panel domain model - Typed view over dashboard panel documents
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::TemplateError;

/// Height (in grid units) assumed for panels that do not declare one.
pub const DEFAULT_PANEL_HEIGHT: u32 = 8;
/// Width (in grid units) given to panels that carry no layout at all.
pub const DEFAULT_PANEL_WIDTH: u32 = 24;

const HEADER_PANEL_TYPE: &str = "row";

fn default_height() -> u32 {
    DEFAULT_PANEL_HEIGHT
}

fn default_width() -> u32 {
    DEFAULT_PANEL_WIDTH
}

/// Grid placement of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    #[serde(default = "default_height")]
    pub h: u32,
    #[serde(default = "default_width")]
    pub w: u32,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
}

impl Default for GridPos {
    fn default() -> Self {
        Self {
            h: DEFAULT_PANEL_HEIGHT,
            w: DEFAULT_PANEL_WIDTH,
            x: 0,
            y: 0,
        }
    }
}

/// Backend families a data-source reference can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceClass {
    Relational,
    TimeSeries,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataSourceRef {
    pub fn class(&self) -> DataSourceClass {
        match self.kind.as_deref() {
            Some("grafana-postgresql-datasource") | Some("postgres") => DataSourceClass::Relational,
            Some("prometheus") => DataSourceClass::TimeSeries,
            _ => DataSourceClass::Other,
        }
    }
}

/// One query attached to a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DataSourceRef>,
    /// Structured (SQL) query text.
    #[serde(rename = "rawSql", default, skip_serializing_if = "Option::is_none")]
    pub raw_sql: Option<String>,
    /// Time-series (PromQL) query text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelBody {
    /// Section marker that opens an agent's block.
    Header { title: String },
    Metric { panel_type: String },
}

/// A dashboard panel. Fields the reconciler never interprets are kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPanel", into = "RawPanel")]
pub struct Panel {
    pub id: Option<u32>,
    pub grid_pos: Option<GridPos>,
    pub datasource: Option<DataSourceRef>,
    /// Queries of the panel; `None` when the panel declares no `targets` key.
    pub targets: Option<Vec<QueryTarget>>,
    pub body: PanelBody,
    pub extra: Map<String, Value>,
}

impl Panel {
    #[cfg(test)]
    pub fn header(title: impl Into<String>, grid_pos: Option<GridPos>) -> Self {
        Self {
            id: None,
            grid_pos,
            datasource: None,
            targets: None,
            body: PanelBody::Header {
                title: title.into(),
            },
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn metric(
        panel_type: impl Into<String>,
        datasource: Option<DataSourceRef>,
        targets: Vec<QueryTarget>,
        grid_pos: Option<GridPos>,
    ) -> Self {
        Self {
            id: None,
            grid_pos,
            datasource,
            targets: Some(targets),
            body: PanelBody::Metric {
                panel_type: panel_type.into(),
            },
            extra: Map::new(),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self.body, PanelBody::Header { .. })
    }

    #[cfg(test)]
    pub fn title(&self) -> Option<&str> {
        match &self.body {
            PanelBody::Header { title } => Some(title),
            PanelBody::Metric { .. } => self.extra.get("title").and_then(Value::as_str),
        }
    }

    #[cfg(test)]
    pub fn targets(&self) -> &[QueryTarget] {
        self.targets.as_deref().unwrap_or(&[])
    }

    /// Declared height, or the default when the panel has no layout.
    pub fn height(&self) -> u32 {
        self.grid_pos.map(|g| g.h).unwrap_or(DEFAULT_PANEL_HEIGHT)
    }
}

/// Wire shape of a panel, as found in template files and sent upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPanel {
    #[serde(rename = "type")]
    panel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    #[serde(rename = "gridPos", default, skip_serializing_if = "Option::is_none")]
    grid_pos: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datasource: Option<DataSourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    targets: Option<Vec<QueryTarget>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawPanel> for Panel {
    type Error = TemplateError;

    fn try_from(raw: RawPanel) -> Result<Self, Self::Error> {
        let RawPanel {
            panel_type,
            id,
            grid_pos,
            datasource,
            targets,
            mut extra,
        } = raw;

        let panel_type = panel_type.ok_or(TemplateError::MissingField("type"))?;

        let body = if panel_type == HEADER_PANEL_TYPE {
            let title = match extra.remove("title") {
                Some(Value::String(title)) => title,
                Some(_) => return Err(TemplateError::InvalidField("title")),
                None => String::new(),
            };
            PanelBody::Header { title }
        } else {
            PanelBody::Metric { panel_type }
        };

        Ok(Self {
            id,
            grid_pos,
            datasource,
            targets,
            body,
            extra,
        })
    }
}

impl From<Panel> for RawPanel {
    fn from(panel: Panel) -> Self {
        let mut extra = panel.extra;
        let panel_type = match panel.body {
            PanelBody::Header { title } => {
                extra.insert("title".to_string(), Value::String(title));
                HEADER_PANEL_TYPE.to_string()
            }
            PanelBody::Metric { panel_type } => panel_type,
        };

        Self {
            panel_type: Some(panel_type),
            id: panel.id,
            grid_pos: panel.grid_pos,
            datasource: panel.datasource,
            targets: panel.targets,
            extra,
        }
    }
}
