//! Per-network configuration.
//!
//! One `NetworkConfig` describes everything that differs between testnet and
//! mainnet: token table, native token id, class-transfer scale, perp asset
//! indices and spot pairs. Loaded from TOML or built in code for tests.

use crate::error::{RegistryError, RegistryResult};
use alloy_primitives::address;
use hypervault_core::{Network, TokenConfig, MAX_DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::system_address::NATIVE_SYSTEM_ADDRESS;

/// Perpetual market index on Core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpAsset {
    /// Coin name as reported by the info API (e.g., "BTC").
    pub coin: String,
    pub asset_id: u32,
}

/// Spot pair traded through the limit order action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPair {
    pub base: String,
    pub quote: String,
    /// Asset id used in the limit order action.
    pub asset_id: u32,
}

impl SpotPair {
    /// "BASE/QUOTE".
    pub fn name(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network: Network,
    /// EVM chain id.
    pub chain_id: u64,
    /// Info API endpoint.
    pub info_url: String,
    /// Core token id of the native gas token.
    pub native_token_id: u64,
    /// Decimals of the `ntl` field in class transfers.
    pub usd_class_decimals: u8,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub perp_assets: Vec<PerpAsset>,
    #[serde(default)]
    pub spot_pairs: Vec<SpotPair>,
}

impl NetworkConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(
            path = %path.display(),
            network = %config.network,
            tokens = config.tokens.len(),
            "Loaded network configuration"
        );
        Ok(config)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            chain_id: 998,
            info_url: "https://api.hyperliquid-testnet.xyz/info".to_string(),
            native_token_id: 135,
            usd_class_decimals: 8,
            tokens: vec![
                TokenConfig::new(
                    "USDC",
                    address!("2b3370ee501b4a559b57d449569354196457d8ab"),
                    6,
                    0,
                    8,
                ),
                TokenConfig::new("HYPE", NATIVE_SYSTEM_ADDRESS, 18, 135, 8),
            ],
            perp_assets: vec![
                perp("SOL", 0),
                perp("APT", 1),
                perp("ATOM", 2),
                perp("BTC", 3),
                perp("ETH", 4),
                perp("HYPE", 135),
            ],
            spot_pairs: vec![SpotPair {
                base: "HYPE".to_string(),
                quote: "USDC".to_string(),
                asset_id: 114,
            }],
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            chain_id: 999,
            info_url: "https://api.hyperliquid.xyz/info".to_string(),
            native_token_id: 150,
            usd_class_decimals: 6,
            tokens: vec![
                TokenConfig::new(
                    "USDC",
                    address!("b88339cb7199b77e23db6e890353e22632ba630f"),
                    6,
                    0,
                    8,
                ),
                TokenConfig::new(
                    "USDT",
                    address!("b8ce59fc3717ada4c02eadf9682a9e934f625ebb"),
                    6,
                    268,
                    8,
                ),
                TokenConfig::new("HYPE", NATIVE_SYSTEM_ADDRESS, 18, 150, 8),
            ],
            perp_assets: vec![
                perp("BTC", 0),
                perp("ETH", 1),
                perp("SOL", 5),
                perp("HYPE", 159),
            ],
            spot_pairs: vec![SpotPair {
                base: "HYPE".to_string(),
                quote: "USDT".to_string(),
                asset_id: 268,
            }],
        }
    }

    /// Check internal consistency.
    ///
    /// Token ids and symbols must be unique, every decimals field must be
    /// representable, and perp coin names must not repeat.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.info_url.trim().is_empty() {
            return Err(RegistryError::InvalidConfig("info_url is empty".to_string()));
        }
        if self.usd_class_decimals > MAX_DECIMALS {
            return Err(RegistryError::InvalidConfig(format!(
                "usd_class_decimals {} exceeds {}",
                self.usd_class_decimals, MAX_DECIMALS
            )));
        }

        let mut ids = HashSet::new();
        let mut symbols = HashSet::new();
        for token in &self.tokens {
            if token.decimals > MAX_DECIMALS || token.core_decimals > MAX_DECIMALS {
                return Err(RegistryError::InvalidConfig(format!(
                    "{token}: decimals out of range"
                )));
            }
            if !ids.insert(token.core_token_id) {
                return Err(RegistryError::InvalidConfig(format!(
                    "duplicate core token id {}",
                    token.core_token_id
                )));
            }
            if !symbols.insert(token.symbol.to_ascii_uppercase()) {
                return Err(RegistryError::InvalidConfig(format!(
                    "duplicate token symbol {}",
                    token.symbol
                )));
            }
        }

        let mut coins = HashSet::new();
        for asset in &self.perp_assets {
            if !coins.insert(asset.coin.to_ascii_uppercase()) {
                return Err(RegistryError::InvalidConfig(format!(
                    "duplicate perp coin {}",
                    asset.coin
                )));
            }
        }

        Ok(())
    }
}

fn perp(coin: &str, asset_id: u32) -> PerpAsset {
    PerpAsset {
        coin: coin.to_string(),
        asset_id,
    }
}
