//! Token identification and metadata.
//!
//! A token exists on two layers: as an EVM contract with its own decimals,
//! and as a Core-side token id with Core (wei) decimals. The same symbol can
//! map to different ids on different networks, so a `TokenConfig` is only
//! meaningful together with the `Network` whose registry produced it.

use crate::error::{CoreError, CoreResult};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Tokens the vault knows how to handle.
///
/// Closed set: adding a token means adding a variant, and every `match`
/// over it must be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupportedToken {
    Usdc,
    Usdt,
    Hype,
}

impl SupportedToken {
    pub const ALL: [SupportedToken; 3] = [Self::Usdc, Self::Usdt, Self::Hype];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usdc => "USDC",
            Self::Usdt => "USDT",
            Self::Hype => "HYPE",
        }
    }

    /// Whether the token is a USD stablecoin usable for class transfers.
    pub fn is_stablecoin(&self) -> bool {
        match self {
            Self::Usdc | Self::Usdt => true,
            Self::Hype => false,
        }
    }
}

impl fmt::Display for SupportedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for SupportedToken {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USDC" => Ok(Self::Usdc),
            "USDT" | "USDT0" => Ok(Self::Usdt),
            "HYPE" => Ok(Self::Hype),
            _ => Err(CoreError::UnknownSymbol(s.to_string())),
        }
    }
}

/// Token metadata on both layers.
///
/// Immutable once registered; looked up by symbol or `core_token_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Symbol (e.g., "USDC", "HYPE").
    pub symbol: String,
    /// EVM contract address. The native gas token uses its system address.
    pub evm_address: Address,
    /// EVM-side decimals (6 for USDC/USDT, 18 for HYPE).
    pub decimals: u8,
    /// Numeric Core-side token id.
    pub core_token_id: u64,
    /// Core-side (wei) decimals, often 8.
    pub core_decimals: u8,
}

impl TokenConfig {
    pub fn new(
        symbol: impl Into<String>,
        evm_address: Address,
        decimals: u8,
        core_token_id: u64,
        core_decimals: u8,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            evm_address,
            decimals,
            core_token_id,
            core_decimals,
        }
    }

    /// Whether this token is the network's native gas token.
    pub fn is_native(&self, native_token_id: u64) -> bool {
        self.core_token_id == native_token_id
    }
}

impl fmt::Display for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.symbol, self.core_token_id)
    }
}
