//! Vault error types.

use alloy_primitives::U256;
use hypervault_bridge::BridgeError;
use hypervault_core::CoreError;
use hypervault_ledger::LedgerError;
use hypervault_registry::RegistryError;
use hypervault_trading::TradingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Trading(#[from] TradingError),

    #[error("Insufficient liquidity in custody: available {available}, requested {requested}")]
    InsufficientLiquidity { available: U256, requested: U256 },

    #[error("Withdrawal percentage must be 1..=10000 bps, got {0}")]
    InvalidPercentage(u32),

    #[error("Deposit asset must be a stablecoin, got {0}")]
    NotStablecoin(String),
}

pub type VaultResult<T> = Result<T, VaultError>;
