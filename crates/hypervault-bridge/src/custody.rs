//! EVM-side balances held by the vault contract.

use crate::error::{BridgeError, BridgeResult};
use alloy_primitives::U256;
use hypervault_core::TokenConfig;
use std::collections::HashMap;

/// Vault's own EVM token balances, in EVM decimals, keyed by Core token id.
#[derive(Debug, Clone, Default)]
pub struct EvmCustody {
    balances: HashMap<u64, U256>,
}

impl EvmCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, token: &TokenConfig) -> U256 {
        self.balances
            .get(&token.core_token_id)
            .copied()
            .unwrap_or_default()
    }

    /// Fail unless at least `amount` is held.
    pub fn ensure(&self, token: &TokenConfig, amount: U256) -> BridgeResult<()> {
        let available = self.balance(token);
        if available < amount {
            return Err(BridgeError::InsufficientBalance {
                symbol: token.symbol.clone(),
                available,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Balance after crediting `amount`, without crediting it.
    pub fn check_credit(&self, token: &TokenConfig, amount: U256) -> BridgeResult<U256> {
        self.balance(token)
            .checked_add(amount)
            .ok_or(BridgeError::Overflow("custody credit"))
    }

    /// Add `amount`. Returns the new balance.
    pub fn credit(&mut self, token: &TokenConfig, amount: U256) -> BridgeResult<U256> {
        let updated = self.check_credit(token, amount)?;
        self.balances.insert(token.core_token_id, updated);
        Ok(updated)
    }

    /// Remove `amount`. Returns the new balance.
    pub fn debit(&mut self, token: &TokenConfig, amount: U256) -> BridgeResult<U256> {
        self.ensure(token, amount)?;
        let balance = self.balances.entry(token.core_token_id).or_default();
        *balance -= amount;
        Ok(*balance)
    }
}
