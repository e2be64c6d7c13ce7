//! Bridge error types.

use crate::settlement::SettlementStatus;
use alloy_primitives::{Address, U256};
use hypervault_core::CoreError;
use hypervault_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Insufficient {symbol} balance: available {available}, requested {requested}")]
    InsufficientBalance {
        symbol: String,
        available: U256,
        requested: U256,
    },

    #[error("Invalid destination: {0}")]
    InvalidDestination(Address),

    #[error("Unknown settlement ticket: {0}")]
    UnknownTicket(u64),

    #[error("Settlement ticket {id} already {status}")]
    TicketAlreadyResolved { id: u64, status: SettlementStatus },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
