// HTTP error responses for reconciliation failures
use crate::application::error::ReconcileError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    transient: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_body: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// The request body is present but is not valid embed options.
    InvalidBody(String),
    Reconcile(ReconcileError),
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        Self::Reconcile(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let err = match self {
            ApiError::InvalidBody(_) => return StatusCode::BAD_REQUEST,
            ApiError::Reconcile(err) => err,
        };
        match err {
            ReconcileError::WorkspaceNotFound(_) => StatusCode::NOT_FOUND,
            ReconcileError::Template(_) | ReconcileError::Registry(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ReconcileError::Backend { .. } | ReconcileError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            ReconcileError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ReconcileError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn kind(&self) -> &'static str {
        let err = match self {
            ApiError::InvalidBody(_) => return "invalid_body",
            ApiError::Reconcile(err) => err,
        };
        match err {
            ReconcileError::WorkspaceNotFound(_) => "workspace_not_found",
            ReconcileError::Template(_) => "template_integrity",
            ReconcileError::Registry(_) => "registry",
            ReconcileError::Backend { .. } => "backend_upsert",
            ReconcileError::InvalidResponse(_) => "backend_response",
            ReconcileError::Timeout(_) => "backend_timeout",
            ReconcileError::Transport(_) => "backend_unreachable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.kind();

        let body = match self {
            ApiError::InvalidBody(message) => {
                tracing::debug!("Rejected request body: {}", message);
                ErrorBody {
                    error,
                    message,
                    transient: false,
                    upstream_status: None,
                    upstream_body: None,
                }
            }
            ApiError::Reconcile(err) => {
                if err.is_transient() {
                    tracing::warn!("Reconciliation failed (transient): {}", err);
                } else if status.is_server_error() {
                    tracing::error!("Reconciliation failed: {}", err);
                }

                let message = err.to_string();
                let transient = err.is_transient();
                let (upstream_status, upstream_body) = match err {
                    ReconcileError::Backend { status, body } => (Some(status), Some(body)),
                    _ => (None, None),
                };
                ErrorBody {
                    error,
                    message,
                    transient,
                    upstream_status,
                    upstream_body,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TemplateError;

    #[test]
    fn test_status_mapping() {
        let status = |err: ReconcileError| ApiError::from(err).status();
        assert_eq!(status(ReconcileError::WorkspaceNotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status(TemplateError::MissingHeader.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(ReconcileError::Backend { status: 500, body: String::new() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status(ReconcileError::Timeout("t".into())), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status(ReconcileError::Transport("t".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::InvalidBody("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
