//! Bridge controller for the hypervault.
//!
//! Moves value between the vault's EVM custody and its Core spot/perp
//! balances. Every movement is submitted through a `CoreSink` and tracked by
//! a settlement ticket that only the caller can resolve.

pub mod controller;
pub mod custody;
pub mod error;
pub mod settlement;

pub use controller::{rescale, BridgeController};
pub use custody::EvmCustody;
pub use error::{BridgeError, BridgeResult};
pub use settlement::{SettlementBook, SettlementOutcome, SettlementStatus, SettlementTicket};
