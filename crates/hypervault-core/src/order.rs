//! Order-related types and identifiers.
//!
//! Provides order side, time-in-force with its protocol code table, client
//! order IDs and the scaled `OrderRequest` submitted to Core.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }

    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Self::Buy
        } else {
            Self::Sell
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Time-in-force for orders.
///
/// Protocol codes: ALO = 1, GTC = 2, IOC = 3. Code 0 is not a valid TIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Add-liquidity-only (post only).
    #[serde(rename = "Alo")]
    AddLiquidityOnly,
    /// Good-til-cancel.
    #[serde(rename = "Gtc")]
    GoodTilCancel,
    /// Immediate-or-cancel.
    #[serde(rename = "Ioc")]
    ImmediateOrCancel,
}

impl TimeInForce {
    /// Protocol byte for this TIF.
    pub const fn encode(self) -> u8 {
        match self {
            Self::AddLiquidityOnly => 1,
            Self::GoodTilCancel => 2,
            Self::ImmediateOrCancel => 3,
        }
    }
}

impl TryFrom<u8> for TimeInForce {
    type Error = CoreError;

    fn try_from(code: u8) -> CoreResult<Self> {
        match code {
            1 => Ok(Self::AddLiquidityOnly),
            2 => Ok(Self::GoodTilCancel),
            3 => Ok(Self::ImmediateOrCancel),
            other => Err(CoreError::InvalidTimeInForce(other)),
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddLiquidityOnly => write!(f, "Alo"),
            Self::GoodTilCancel => write!(f, "Gtc"),
            Self::ImmediateOrCancel => write!(f, "Ioc"),
        }
    }
}

/// Client order ID carried on the wire as a 64-bit integer.
///
/// Zero means "no client order id".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(u64);

impl ClientOrderId {
    pub const NONE: Self = Self(0);

    /// Generate a random non-zero client order ID.
    pub fn generate() -> Self {
        loop {
            let (hi, _) = Uuid::new_v4().as_u64_pair();
            if hi != 0 {
                return Self(hi);
            }
        }
    }

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Limit order submitted to the Core engine.
///
/// Prices and sizes are scaled by 1e8 regardless of the token's decimals.
/// Transient: constructed per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub core_asset_id: u32,
    pub is_buy: bool,
    pub limit_price_scaled: u64,
    pub size_scaled: u64,
    pub reduce_only: bool,
    pub time_in_force: TimeInForce,
    pub client_order_id: ClientOrderId,
}

impl OrderRequest {
    pub fn side(&self) -> OrderSide {
        OrderSide::from_is_buy(self.is_buy)
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} asset={} px={} sz={} tif={}{}",
            self.side(),
            self.core_asset_id,
            self.limit_price_scaled,
            self.size_scaled,
            self.time_in_force,
            if self.reduce_only { " reduce_only" } else { "" }
        )
    }
}
