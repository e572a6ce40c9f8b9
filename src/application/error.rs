// Reconciliation errors
use crate::domain::error::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Template integrity error: {0}")]
    Template(#[from] TemplateError),

    #[error("Dashboard backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Dashboard backend timed out: {0}")]
    Timeout(String),

    #[error("Failed to reach dashboard backend: {0}")]
    Transport(String),

    #[error("Unexpected dashboard backend response: {0}")]
    InvalidResponse(String),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(i64),

    #[error("Agent registry error: {0}")]
    Registry(String),
}

impl ReconcileError {
    /// Whether re-running the same reconciliation is likely to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_keeps_status_and_body() {
        let err = ReconcileError::Backend {
            status: 500,
            body: r#"{"message":"bad request"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Dashboard backend returned 500: {"message":"bad request"}"#
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_kinds() {
        assert!(ReconcileError::Timeout("10s".into()).is_transient());
        assert!(ReconcileError::Transport("refused".into()).is_transient());
        assert!(!ReconcileError::from(TemplateError::MissingHeader).is_transient());
    }
}
