// Grafana client - Dashboard upsert over the HTTP API
use crate::application::dashboard_backend::{DashboardBackend, UpsertRequest, UpsertResponse};
use crate::application::error::ReconcileError;
use async_trait::async_trait;
use std::time::Duration;

const UPSERT_PATH: &str = "/api/dashboards/db";

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    host: String,
    token: String,
    folder_uid: Option<String>,
    client: reqwest::Client,
}

impl GrafanaClient {
    pub fn new(
        host: String,
        token: String,
        folder_uid: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            folder_uid: folder_uid.filter(|uid| !uid.is_empty()),
            client,
        })
    }

    fn classify(err: reqwest::Error) -> ReconcileError {
        if err.is_timeout() {
            ReconcileError::Timeout(err.to_string())
        } else {
            ReconcileError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl DashboardBackend for GrafanaClient {
    async fn upsert(&self, mut request: UpsertRequest) -> Result<UpsertResponse, ReconcileError> {
        if request.folder_uid.is_none() {
            request.folder_uid = self.folder_uid.clone();
        }

        let url = format!("{}{}", self.host, UPSERT_PATH);
        tracing::debug!(
            "Upserting dashboard {:?} ({} panels) to {}",
            request.dashboard.uid,
            request.dashboard.panels.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Self::classify)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.map_err(Self::classify)?;
            return Err(ReconcileError::Backend { status, body });
        }

        let body = response.text().await.map_err(Self::classify)?;
        let data: UpsertResponse = serde_json::from_str(&body)
            .map_err(|e| ReconcileError::InvalidResponse(format!("{}: {}", e, body)))?;

        tracing::debug!(
            "Grafana stored dashboard {} (id {:?}, slug {:?}, version {:?}, status {:?})",
            data.uid,
            data.id,
            data.slug,
            data.version,
            data.status
        );
        Ok(data)
    }

    fn base_url(&self) -> &str {
        &self.host
    }
}
