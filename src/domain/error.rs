// Template integrity errors
use thiserror::Error;

/// A template document is missing or has malformed structure the
/// reconciler relies on.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Failed to parse template: {0}")]
    Parse(String),

    #[error("Template is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Template field has an unexpected shape: {0}")]
    InvalidField(&'static str),

    #[error("Panel block has no section header panel")]
    MissingHeader,

    #[error("Panel block is empty")]
    EmptyBlock,

    #[error("Invalid placeholder token: {0}")]
    InvalidPlaceholder(String),
}
