//! Ledger error types.

use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Insufficient shares for {depositor}: requested {requested}, available {available}")]
    InsufficientShares {
        depositor: Address,
        requested: U256,
        available: U256,
    },

    #[error("Deposit of {assets} would mint zero shares")]
    ZeroShares { assets: U256 },

    #[error("Vault is insolvent: {total_shares} shares outstanding against zero assets")]
    VaultInsolvent { total_shares: U256 },

    #[error("Vault has no shares outstanding")]
    EmptyVault,

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
