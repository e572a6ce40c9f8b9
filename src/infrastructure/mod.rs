// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod config_registry;
pub mod grafana_client;
pub mod template_store;
