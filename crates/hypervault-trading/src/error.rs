//! Trading error types.

use hypervault_core::CoreError;
use hypervault_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradingError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("No price available for {0}")]
    MissingPrice(String),

    #[error("Unknown spot pair: {0}")]
    UnknownPair(String),
}

pub type TradingResult<T> = Result<T, TradingError>;
