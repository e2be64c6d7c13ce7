//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] hypervault_core::CoreError),

    #[error("Registry error: {0}")]
    Registry(#[from] hypervault_registry::RegistryError),

    #[error("Trading error: {0}")]
    Trading(#[from] hypervault_trading::TradingError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] hypervault_telemetry::TelemetryError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
