//! Configuration module for wolmcp
//!
//! Defines the application configuration (TOML file + environment
//! overrides) and config-directory resolution.

pub mod app_config;
pub mod path_resolver;

pub use app_config::AppConfig;
