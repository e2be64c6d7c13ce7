//! Core domain types for the hypervault.
//!
//! This crate provides the fundamental types shared by every vault component:
//! - `codec`: fixed-point scaling between human decimals and Core integers
//! - `TokenConfig`, `SupportedToken`: token metadata per network
//! - `OrderRequest`, `TimeInForce`: the limit-order model and its TIF table
//! - `CoreAction`, `EvmTransfer`: the outbound action protocol
//! - `CoreSink`: the seam through which actions leave the vault
//! - `AccessControl`, `OwnerAuth`: owner gating

pub mod access;
pub mod action;
pub mod codec;
pub mod error;
pub mod order;
pub mod sink;
pub mod token;
pub mod transfer;

pub use access::{AccessControl, OwnerAuth};
pub use action::{ActionKind, CoreAction, EvmTransfer, Outbound, CORE_ACTION_VERSION};
pub use codec::{scale, unscale, Price, ScaledAmount, Size, MAX_DECIMALS, TRADING_DECIMALS};
pub use error::{CoreError, CoreResult};
pub use order::{ClientOrderId, OrderRequest, OrderSide, TimeInForce};
pub use sink::{CoreSink, DynCoreSink, RecordingSink, SubmitResult};
pub use token::{Network, SupportedToken, TokenConfig};
pub use transfer::{BridgeTransfer, TransferDirection};

pub use alloy_primitives::{Address, I256, U256};
