// Application layer - Use cases and the ports they depend on
pub mod agent_registry;
pub mod dashboard_backend;
pub mod error;
pub mod monitor_service;
pub mod reconciler;
