// Domain layer - Dashboard documents and the pure reconciliation steps
pub mod agent;
pub mod dashboard;
pub mod embed;
pub mod error;
pub mod layout;
pub mod panel;
pub mod query_rewriter;
