//! Operator tooling for the hypervault.
//!
//! Loads the application and network configuration and exposes the
//! read-only helpers behind the `hypervault` binary.

pub mod commands;
pub mod config;
pub mod error;

pub use config::{resolve_config_path, AppConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
pub use error::{AppError, AppResult};
