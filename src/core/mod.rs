// src/core/mod.rs
//! Configuration and external service plumbing

pub mod config_manager;
pub mod service_client;

pub use config_manager::{
    AppConfig, ConfigManager, LoggingSettings, SearchBackend, SearchSettings, ServerSettings,
};
pub use service_client::RemoteJobSearch;
