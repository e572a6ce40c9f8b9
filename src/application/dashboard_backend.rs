// Port to the visualization backend that stores dashboards
use crate::application::error::ReconcileError;
use crate::domain::dashboard::DashboardDocument;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Create-or-overwrite request for one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsertRequest {
    pub dashboard: DashboardDocument,
    #[serde(rename = "folderUid", skip_serializing_if = "Option::is_none")]
    pub folder_uid: Option<String>,
    pub message: String,
    pub overwrite: bool,
}

impl UpsertRequest {
    pub fn overwrite(dashboard: DashboardDocument, message: impl Into<String>) -> Self {
        Self {
            dashboard,
            folder_uid: None,
            message: message.into(),
            overwrite: true,
        }
    }
}

/// Backend acknowledgement of an upsert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpsertResponse {
    pub uid: String,
    /// Path of the stored dashboard relative to the backend's base URL.
    pub url: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Where a reconciled dashboard can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardLocator {
    pub uid: String,
    pub url: String,
}

impl From<UpsertResponse> for DashboardLocator {
    fn from(res: UpsertResponse) -> Self {
        Self {
            uid: res.uid,
            url: res.url,
        }
    }
}

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Submit one document; either it is stored whole or the call fails.
    async fn upsert(&self, request: UpsertRequest) -> Result<UpsertResponse, ReconcileError>;

    /// Base URL that returned dashboard paths are relative to.
    fn base_url(&self) -> &str;
}
