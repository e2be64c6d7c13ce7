//! Read-only vault queries.

use crate::error::VaultResult;
use crate::vault::Vault;
use alloy_primitives::{Address, I256, U256};
use hypervault_bridge::SettlementTicket;
use hypervault_core::{Network, TokenConfig};
use hypervault_ledger::StateReport;
use hypervault_registry::AssetRegistry;
use serde::Serialize;

/// Snapshot of vault-wide figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultInfo {
    pub address: Address,
    pub owner: Address,
    pub network: Network,
    pub asset: String,
    pub total_assets: U256,
    pub total_shares: U256,
    /// Scaled by 1e18.
    pub price_per_share: U256,
    pub total_deposits: U256,
    pub total_yield: I256,
    /// Deposit asset held on the EVM layer.
    pub custody_balance: U256,
    pub pending_settlements: usize,
}

impl Vault {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn asset(&self) -> &TokenConfig {
        &self.asset
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn total_assets(&self) -> U256 {
        self.ledger.total_assets()
    }

    pub fn total_shares(&self) -> U256 {
        self.ledger.total_shares()
    }

    pub fn total_deposits(&self) -> U256 {
        self.ledger.total_deposited()
    }

    pub fn total_yield(&self) -> VaultResult<I256> {
        Ok(self.ledger.total_yield()?)
    }

    pub fn get_user_shares(&self, user: &Address) -> U256 {
        self.ledger.shares_of(user)
    }

    pub fn get_user_assets(&self, user: &Address) -> VaultResult<U256> {
        Ok(self.ledger.user_assets(user)?)
    }

    pub fn get_user_deposit(&self, user: &Address) -> U256 {
        self.ledger.user_deposit(user)
    }

    pub fn get_user_yield(&self, user: &Address) -> VaultResult<I256> {
        Ok(self.ledger.user_yield(user)?)
    }

    /// Scaled by 1e18 (1e18 == 100%).
    pub fn get_user_yield_percent(&self, user: &Address) -> VaultResult<I256> {
        Ok(self.ledger.user_yield_percent(user)?)
    }

    /// Scaled by 1e18.
    pub fn get_price_per_share(&self) -> VaultResult<U256> {
        Ok(self.ledger.price_per_share()?)
    }

    pub fn preview_deposit(&self, assets: U256) -> VaultResult<U256> {
        Ok(self.ledger.preview_deposit(assets)?)
    }

    pub fn preview_withdraw(&self, assets: U256) -> VaultResult<U256> {
        Ok(self.ledger.preview_withdraw(assets)?)
    }

    pub fn preview_redeem(&self, shares: U256) -> VaultResult<U256> {
        Ok(self.ledger.preview_redeem(shares)?)
    }

    /// Compare total shares with an externally observed share balance.
    pub fn verify_state(&self, external_shares: U256) -> StateReport {
        self.ledger.verify_state(external_shares)
    }

    /// Balance of `token` held on the EVM layer.
    pub fn custody_balance(&self, token: &TokenConfig) -> U256 {
        self.bridge.custody().balance(token)
    }

    pub fn pending_settlements(&self) -> Vec<&SettlementTicket> {
        self.bridge.settlements().pending()
    }

    pub fn settlement(&self, ticket_id: u64) -> Option<&SettlementTicket> {
        self.bridge.settlements().get(ticket_id)
    }

    pub fn get_vault_info(&self) -> VaultResult<VaultInfo> {
        Ok(VaultInfo {
            address: self.address,
            owner: self.owner(),
            network: self.registry.network(),
            asset: self.asset.symbol.clone(),
            total_assets: self.total_assets(),
            total_shares: self.total_shares(),
            price_per_share: self.get_price_per_share()?,
            total_deposits: self.total_deposits(),
            total_yield: self.total_yield()?,
            custody_balance: self.custody_balance(&self.asset),
            pending_settlements: self.pending_settlements().len(),
        })
    }
}
