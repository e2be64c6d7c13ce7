//! Outbound action protocol.
//!
//! Two kinds of value leave the vault:
//! - `CoreAction`: a raw action for the Core engine, encoded as
//!   `version (1 byte) || action id (u24 big-endian) || abi.encode(params)`
//! - `EvmTransfer`: a plain EVM transfer to a system address, which Core
//!   observes and credits to the vault's spot balance
//!
//! Both are fire-and-forget from the vault's point of view.

use crate::order::OrderRequest;
use alloy::sol;
use alloy::sol_types::SolValue;
use alloy_primitives::{Address, U256};
use std::fmt;

/// Encoding version prefixed to every raw action.
pub const CORE_ACTION_VERSION: u8 = 1;

sol! {
    struct LimitOrderParams {
        uint32 asset;
        bool is_buy;
        uint64 limit_px;
        uint64 sz;
        bool reduce_only;
        uint8 encoded_tif;
        uint128 cloid;
    }

    struct SpotSendParams {
        address destination;
        uint64 token;
        uint64 wei;
    }

    struct UsdClassTransferParams {
        uint64 ntl;
        bool to_perp;
    }

    struct AddApiWalletParams {
        address wallet;
        string name;
    }
}

/// Core action identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    LimitOrder,
    SpotSend,
    UsdClassTransfer,
    AddApiWallet,
}

impl ActionKind {
    pub const fn id(self) -> u32 {
        match self {
            Self::LimitOrder => 1,
            Self::SpotSend => 6,
            Self::UsdClassTransfer => 7,
            Self::AddApiWallet => 9,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitOrder => write!(f, "limitOrder"),
            Self::SpotSend => write!(f, "spotSend"),
            Self::UsdClassTransfer => write!(f, "usdClassTransfer"),
            Self::AddApiWallet => write!(f, "addApiWallet"),
        }
    }
}

/// Action addressed to the Core engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAction {
    LimitOrder(OrderRequest),
    SpotSend {
        destination: Address,
        core_token_id: u64,
        wei: u64,
    },
    UsdClassTransfer {
        ntl: u64,
        to_perp: bool,
    },
    /// Authorise `wallet` to sign Core actions for the vault.
    AddApiWallet {
        wallet: Address,
        name: String,
    },
}

impl CoreAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::LimitOrder(_) => ActionKind::LimitOrder,
            Self::SpotSend { .. } => ActionKind::SpotSend,
            Self::UsdClassTransfer { .. } => ActionKind::UsdClassTransfer,
            Self::AddApiWallet { .. } => ActionKind::AddApiWallet,
        }
    }

    /// Encode to the raw byte string Core consumes.
    ///
    /// Parameters are encoded as a flat argument list, so a dynamic field
    /// is not preceded by a tuple offset.
    pub fn encode(&self) -> Vec<u8> {
        let params = match self {
            Self::LimitOrder(order) => LimitOrderParams {
                asset: order.core_asset_id,
                is_buy: order.is_buy,
                limit_px: order.limit_price_scaled,
                sz: order.size_scaled,
                reduce_only: order.reduce_only,
                encoded_tif: order.time_in_force.encode(),
                cloid: order.client_order_id.value() as u128,
            }
            .abi_encode_params(),
            Self::SpotSend {
                destination,
                core_token_id,
                wei,
            } => SpotSendParams {
                destination: *destination,
                token: *core_token_id,
                wei: *wei,
            }
            .abi_encode_params(),
            Self::UsdClassTransfer { ntl, to_perp } => UsdClassTransferParams {
                ntl: *ntl,
                to_perp: *to_perp,
            }
            .abi_encode_params(),
            Self::AddApiWallet { wallet, name } => AddApiWalletParams {
                wallet: *wallet,
                name: name.clone(),
            }
            .abi_encode_params(),
        };

        let mut out = Vec::with_capacity(4 + params.len());
        out.push(CORE_ACTION_VERSION);
        out.extend_from_slice(&self.kind().id().to_be_bytes()[1..]);
        out.extend_from_slice(&params);
        out
    }

    /// Hex rendering of the encoded action (with `0x` prefix).
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }
}

/// EVM transfer into a system address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTransfer {
    pub symbol: String,
    /// Token contract; ignored for native transfers.
    pub token_contract: Address,
    /// System address receiving the value.
    pub to: Address,
    /// Amount in EVM decimals.
    pub amount: U256,
    /// Value-bearing native transfer instead of an ERC-20 transfer.
    pub native: bool,
}

/// Anything the vault hands to a `CoreSink`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Action(CoreAction),
    Transfer(EvmTransfer),
}

impl Outbound {
    pub fn as_action(&self) -> Option<&CoreAction> {
        match self {
            Self::Action(action) => Some(action),
            Self::Transfer(_) => None,
        }
    }

    pub fn as_transfer(&self) -> Option<&EvmTransfer> {
        match self {
            Self::Action(_) => None,
            Self::Transfer(transfer) => Some(transfer),
        }
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(action) => write!(f, "action:{}", action.kind()),
            Self::Transfer(t) => write!(f, "transfer:{} {} -> {}", t.symbol, t.amount, t.to),
        }
    }
}
