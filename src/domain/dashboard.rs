// Dashboard domain model - Base skeleton and assembled documents
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::panel::Panel;

pub const DEFAULT_TIME_FROM: &str = "now-3h";
pub const DEFAULT_TIME_TO: &str = "now";
pub const DEFAULT_REFRESH: &str = "5s";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_FROM, DEFAULT_TIME_TO)
    }
}

/// Dashboard-level metadata shared by every generated dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardSkeleton {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub time: Option<TimeRange>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complete document as submitted to the visualization backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    pub panels: Vec<Panel>,
    pub tags: Vec<String>,
    pub time: TimeRange,
    pub refresh: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-call overrides applied on top of the skeleton.
#[derive(Debug, Clone, Default)]
pub struct DashboardSpec {
    pub title: String,
    pub panels: Vec<Panel>,
    pub uid: Option<String>,
    pub tags: Vec<String>,
    pub time: Option<TimeRange>,
    pub refresh: Option<String>,
}

impl DashboardSpec {
    pub fn new(title: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            title: title.into(),
            panels,
            ..Self::default()
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[cfg(test)]
    pub fn with_time(mut self, time: TimeRange) -> Self {
        self.time = Some(time);
        self
    }

    #[cfg(test)]
    pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }
}

/// Merge `spec` into `base`. Panels always come from `spec`; tags are the
/// deduplicated union of both; time and refresh fall back from spec to base
/// to the built-in defaults.
pub fn assemble(base: &DashboardSkeleton, spec: DashboardSpec) -> DashboardDocument {
    let mut extra = base.extra.clone();
    // Anything the skeleton carries under these keys is superseded.
    for key in ["panels", "title", "id"] {
        extra.remove(key);
    }

    let tags: BTreeSet<String> = base.tags.iter().cloned().chain(spec.tags).collect();

    DashboardDocument {
        uid: spec.uid.or_else(|| base.uid.clone()),
        title: spec.title,
        panels: spec.panels,
        tags: tags.into_iter().collect(),
        time: spec.time.or_else(|| base.time.clone()).unwrap_or_default(),
        refresh: spec
            .refresh
            .or_else(|| base.refresh.clone())
            .unwrap_or_else(|| DEFAULT_REFRESH.to_string()),
        extra,
    }
}
