//! Asset registry.
//!
//! Owns the token table for exactly one network. Symbols are matched
//! case-insensitively; `core_token_id` is unique within a registry.

use crate::error::{RegistryError, RegistryResult};
use crate::network::{NetworkConfig, SpotPair};
use crate::system_address::system_address_for;
use alloy_primitives::Address;
use hypervault_core::{CoreError, Network, SupportedToken, TokenConfig, MAX_DECIMALS};
use std::collections::HashMap;
use tracing::{debug, info};

/// Token and market lookup for one network.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    network: Network,
    native_token_id: u64,
    usd_class_decimals: u8,
    /// Tokens keyed by upper-cased symbol.
    tokens: HashMap<String, TokenConfig>,
    /// Core token id to upper-cased symbol.
    by_id: HashMap<u64, String>,
    /// Perp coin (upper-cased) to asset index.
    perp_assets: HashMap<String, u32>,
    spot_pairs: Vec<SpotPair>,
}

impl AssetRegistry {
    /// Empty registry for `network`.
    pub fn new(network: Network, native_token_id: u64, usd_class_decimals: u8) -> Self {
        Self {
            network,
            native_token_id,
            usd_class_decimals,
            tokens: HashMap::new(),
            by_id: HashMap::new(),
            perp_assets: HashMap::new(),
            spot_pairs: Vec::new(),
        }
    }

    /// Build a registry from a validated network configuration.
    pub fn from_config(config: &NetworkConfig) -> RegistryResult<Self> {
        config.validate()?;

        let mut registry = Self::new(
            config.network,
            config.native_token_id,
            config.usd_class_decimals,
        );
        for token in &config.tokens {
            registry.register(token.clone())?;
        }
        for asset in &config.perp_assets {
            registry
                .perp_assets
                .insert(asset.coin.to_ascii_uppercase(), asset.asset_id);
        }
        registry.spot_pairs = config.spot_pairs.clone();

        info!(
            network = %registry.network,
            tokens = registry.tokens.len(),
            perp_assets = registry.perp_assets.len(),
            "Asset registry initialized"
        );
        Ok(registry)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn native_token_id(&self) -> u64 {
        self.native_token_id
    }

    /// Decimals a class transfer's `ntl` must be scaled by on this network.
    pub fn usd_class_decimals(&self) -> u8 {
        self.usd_class_decimals
    }

    /// Register or update a token.
    ///
    /// Re-registering a symbol replaces its metadata. Fails with
    /// `DuplicateTokenId` when the id already belongs to another symbol.
    pub fn register(&mut self, token: TokenConfig) -> RegistryResult<()> {
        let key = token.symbol.trim().to_ascii_uppercase();
        if key.is_empty() {
            return Err(CoreError::UnknownSymbol(token.symbol).into());
        }
        for decimals in [token.decimals, token.core_decimals] {
            if decimals > MAX_DECIMALS {
                return Err(CoreError::UnsupportedDecimals(decimals).into());
            }
        }

        if let Some(existing) = self.by_id.get(&token.core_token_id) {
            if *existing != key {
                return Err(RegistryError::DuplicateTokenId {
                    token_id: token.core_token_id,
                    existing: existing.clone(),
                    symbol: key,
                });
            }
        }

        if let Some(previous) = self.tokens.get(&key) {
            if previous.core_token_id != token.core_token_id {
                self.by_id.remove(&previous.core_token_id);
            }
        }

        debug!(
            network = %self.network,
            symbol = %key,
            core_token_id = token.core_token_id,
            "Registered token"
        );
        self.by_id.insert(token.core_token_id, key.clone());
        self.tokens.insert(key, token);
        Ok(())
    }

    /// Look up a token by symbol.
    pub fn resolve(&self, symbol: &str) -> RegistryResult<&TokenConfig> {
        self.tokens
            .get(&symbol.trim().to_ascii_uppercase())
            .ok_or_else(|| RegistryError::UnknownToken(symbol.to_string()))
    }

    /// Look up one of the closed set of supported tokens.
    pub fn resolve_supported(&self, token: SupportedToken) -> RegistryResult<&TokenConfig> {
        self.resolve(token.symbol())
    }

    /// Look up a token by its Core token id.
    pub fn by_token_id(&self, core_token_id: u64) -> RegistryResult<&TokenConfig> {
        self.by_id
            .get(&core_token_id)
            .and_then(|symbol| self.tokens.get(symbol))
            .ok_or(RegistryError::UnknownTokenId(core_token_id))
    }

    /// System address of `token` on this network.
    pub fn system_address(&self, token: &TokenConfig) -> Address {
        system_address_for(token.core_token_id, self.native_token_id)
    }

    pub fn is_native(&self, token: &TokenConfig) -> bool {
        token.is_native(self.native_token_id)
    }

    /// Perp asset index for `coin`.
    pub fn perp_asset_id(&self, coin: &str) -> RegistryResult<u32> {
        self.perp_assets
            .get(&coin.trim().to_ascii_uppercase())
            .copied()
            .ok_or_else(|| RegistryError::UnknownPerpAsset(coin.to_string()))
    }

    /// Spot pair for `base`/`quote`, if configured.
    pub fn spot_pair(&self, base: &str, quote: &str) -> Option<&SpotPair> {
        self.spot_pairs.iter().find(|pair| {
            pair.base.eq_ignore_ascii_case(base) && pair.quote.eq_ignore_ascii_case(quote)
        })
    }

    /// All registered tokens, ordered by Core token id.
    pub fn tokens(&self) -> Vec<&TokenConfig> {
        let mut tokens: Vec<_> = self.tokens.values().collect();
        tokens.sort_by_key(|token| token.core_token_id);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system_address::format_system_address;

    fn testnet() -> AssetRegistry {
        AssetRegistry::from_config(&NetworkConfig::testnet()).unwrap()
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let registry = testnet();
        let usdc = registry.resolve("usdc").unwrap();
        assert_eq!(usdc.core_token_id, 0);
        assert_eq!(usdc.decimals, 6);
        assert_eq!(registry.resolve(" HYPE ").unwrap().core_token_id, 135);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = testnet();
        assert!(matches!(
            registry.resolve("DOGE"),
            Err(RegistryError::UnknownToken(_))
        ));
        // USDT is mainnet-only
        assert!(registry.resolve_supported(SupportedToken::Usdt).is_err());
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = testnet();
        let usdc = registry.resolve("USDC").unwrap().clone();
        registry.register(usdc.clone()).unwrap();
        registry.register(usdc.clone()).unwrap();
        assert_eq!(registry.resolve("USDC").unwrap(), &usdc);
        assert_eq!(registry.tokens().len(), 2);
    }

    #[test]
    fn test_register_upsert_updates_metadata() {
        let mut registry = testnet();
        let mut usdc = registry.resolve("USDC").unwrap().clone();
        usdc.evm_address = Address::repeat_byte(0x11);
        registry.register(usdc).unwrap();
        assert_eq!(
            registry.resolve("USDC").unwrap().evm_address,
            Address::repeat_byte(0x11)
        );
    }

    #[test]
    fn test_register_rejects_duplicate_token_id() {
        let mut registry = testnet();
        let fake = TokenConfig::new("FAKE", Address::repeat_byte(1), 6, 0, 8);
        match registry.register(fake) {
            Err(RegistryError::DuplicateTokenId {
                token_id, existing, ..
            }) => {
                assert_eq!(token_id, 0);
                assert_eq!(existing, "USDC");
            }
            other => panic!("expected DuplicateTokenId, got {other:?}"),
        }
        assert!(registry.resolve("FAKE").is_err());
    }

    #[test]
    fn test_register_moving_id_frees_old_id() {
        let mut registry = testnet();
        let mut usdc = registry.resolve("USDC").unwrap().clone();
        usdc.core_token_id = 7;
        registry.register(usdc).unwrap();

        assert!(registry.by_token_id(0).is_err());
        assert_eq!(registry.by_token_id(7).unwrap().symbol, "USDC");

        let other = TokenConfig::new("PURR", Address::repeat_byte(2), 18, 0, 5);
        registry.register(other).unwrap();
    }

    #[test]
    fn test_register_rejects_bad_decimals() {
        let mut registry = testnet();
        let token = TokenConfig::new("BIG", Address::ZERO, 40, 999, 8);
        assert!(matches!(
            registry.register(token),
            Err(RegistryError::Core(CoreError::UnsupportedDecimals(40)))
        ));
    }

    #[test]
    fn test_by_token_id() {
        let registry = AssetRegistry::from_config(&NetworkConfig::mainnet()).unwrap();
        assert_eq!(registry.by_token_id(268).unwrap().symbol, "USDT");
        assert!(matches!(
            registry.by_token_id(12345),
            Err(RegistryError::UnknownTokenId(12345))
        ));
    }

    #[test]
    fn test_system_address_per_network() {
        let testnet = testnet();
        let mainnet = AssetRegistry::from_config(&NetworkConfig::mainnet()).unwrap();

        let hype_t = testnet.resolve("HYPE").unwrap();
        let hype_m = mainnet.resolve("HYPE").unwrap();
        assert_eq!(testnet.system_address(hype_t), mainnet.system_address(hype_m));
        assert!(testnet.is_native(hype_t));

        let usdt = mainnet.resolve("USDT").unwrap();
        assert_eq!(
            format_system_address(&mainnet.system_address(usdt)),
            "0x200000000000000000000000000000000000010c"
        );
    }

    #[test]
    fn test_perp_and_spot_lookup() {
        let registry = testnet();
        assert_eq!(registry.perp_asset_id("btc").unwrap(), 3);
        assert!(matches!(
            registry.perp_asset_id("XYZ"),
            Err(RegistryError::UnknownPerpAsset(_))
        ));
        assert_eq!(registry.spot_pair("hype", "usdc").unwrap().asset_id, 114);
        assert!(registry.spot_pair("HYPE", "USDT").is_none());
    }

    #[test]
    fn test_independent_networks() {
        let mut a = testnet();
        let b = testnet();
        a.register(TokenConfig::new("PURR", Address::repeat_byte(3), 18, 1, 5))
            .unwrap();
        assert!(a.resolve("PURR").is_ok());
        assert!(b.resolve("PURR").is_err());
    }
}
