//! Registry error types.

use hypervault_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Unknown token id: {0}")]
    UnknownTokenId(u64),

    #[error("Core token id {token_id} already registered as {existing}, cannot register {symbol}")]
    DuplicateTokenId {
        token_id: u64,
        existing: String,
        symbol: String,
    },

    #[error("Unknown perp asset: {0}")]
    UnknownPerpAsset(String),

    #[error("Invalid network configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A single malformed entry in an info API response.
///
/// Entries are validated independently; one bad entry never invalidates
/// the rest of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfoError {
    #[error("{coin}: field {field} is not a decimal: {value}")]
    BadDecimal {
        coin: String,
        field: &'static str,
        value: String,
    },

    #[error("{coin}: missing field {field}")]
    MissingField { coin: String, field: &'static str },
}
