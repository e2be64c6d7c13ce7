//! Vault state and mutating operations.

use crate::error::{VaultError, VaultResult};
use alloy_primitives::{Address, U256};
use hypervault_bridge::{BridgeController, SettlementOutcome, SettlementTicket};
use hypervault_core::{
    AccessControl, DynCoreSink, OrderRequest, OrderSide, Price, ScaledAmount, Size,
    SupportedToken, TimeInForce, TokenConfig,
};
use hypervault_ledger::{LedgerError, ShareLedger};
use hypervault_registry::{AssetRegistry, RegistryError};
use hypervault_trading::{ClosePolicy, CloseReport, OpenPosition, SubmittedOrder, TradingGateway};
use tracing::info;

/// Basis points in 100%.
const BPS_DENOMINATOR: u32 = 10_000;

/// Custodial vault accepting a single stablecoin.
pub struct Vault {
    pub(crate) address: Address,
    pub(crate) access: AccessControl,
    pub(crate) registry: AssetRegistry,
    /// The deposit asset.
    pub(crate) asset: TokenConfig,
    pub(crate) ledger: ShareLedger,
    pub(crate) bridge: BridgeController,
    pub(crate) trading: TradingGateway,
}

impl Vault {
    /// Create an empty vault accepting `asset`.
    pub fn new(
        address: Address,
        owner: Address,
        registry: AssetRegistry,
        asset: SupportedToken,
        sink: DynCoreSink,
    ) -> VaultResult<Self> {
        if !asset.is_stablecoin() {
            return Err(VaultError::NotStablecoin(asset.symbol().to_string()));
        }
        let asset = registry.resolve_supported(asset)?.clone();
        let bridge = BridgeController::new(sink.clone(), address, &registry);

        info!(
            %address,
            %owner,
            network = %registry.network(),
            asset = %asset,
            "Vault created"
        );
        Ok(Self {
            address,
            access: AccessControl::new(owner),
            registry,
            asset,
            ledger: ShareLedger::new(),
            bridge,
            trading: TradingGateway::new(sink),
        })
    }

    /// Deposit `amount` of the vault asset (EVM decimals). Returns shares minted.
    pub fn deposit(&mut self, depositor: Address, amount: U256) -> VaultResult<U256> {
        self.bridge.check_receive(&self.asset, amount)?;
        let shares = self.ledger.deposit(depositor, amount)?;
        self.bridge.receive(&self.asset, amount)?;
        Ok(shares)
    }

    /// Redeem `shares`. Returns assets paid.
    pub fn withdraw(&mut self, depositor: Address, shares: U256) -> VaultResult<U256> {
        if shares.is_zero() {
            return Err(LedgerError::ZeroAmount.into());
        }
        self.require_shares(depositor, shares)?;
        let assets = self.ledger.preview_redeem(shares)?;
        self.pay(depositor, assets)?;
        let paid = self.ledger.withdraw_by_shares(depositor, shares)?;
        Ok(paid)
    }

    /// Withdraw an exact asset amount. Returns shares burned.
    pub fn withdraw_assets(&mut self, depositor: Address, assets: U256) -> VaultResult<U256> {
        if assets.is_zero() {
            return Err(LedgerError::ZeroAmount.into());
        }
        let shares = self.ledger.preview_withdraw(assets)?;
        self.require_shares(depositor, shares)?;
        self.pay(depositor, assets)?;
        let burned = self.ledger.withdraw_by_assets(depositor, assets)?;
        Ok(burned)
    }

    /// Redeem `bps` basis points of the depositor's shares, rounded down.
    pub fn withdraw_percent(&mut self, depositor: Address, bps: u32) -> VaultResult<U256> {
        if bps == 0 || bps > BPS_DENOMINATOR {
            return Err(VaultError::InvalidPercentage(bps));
        }
        let shares = self.ledger.shares_of(&depositor) * U256::from(bps)
            / U256::from(BPS_DENOMINATOR);
        self.withdraw(depositor, shares)
    }

    fn require_shares(&self, depositor: Address, shares: U256) -> VaultResult<()> {
        let available = self.ledger.shares_of(&depositor);
        if shares > available {
            return Err(LedgerError::InsufficientShares {
                depositor,
                requested: shares,
                available,
            }
            .into());
        }
        Ok(())
    }

    /// Release `assets` from custody, failing before any transfer if short.
    fn pay(&mut self, to: Address, assets: U256) -> VaultResult<()> {
        if assets.is_zero() {
            return Ok(());
        }
        let available = self.bridge.custody().balance(&self.asset);
        if available < assets {
            return Err(VaultError::InsufficientLiquidity {
                available,
                requested: assets,
            });
        }
        self.bridge.release(&self.asset, assets, to)?;
        Ok(())
    }

    /// Move custodied tokens to Core spot. Owner only.
    pub fn deposit_to_core(
        &mut self,
        caller: Address,
        symbol: &str,
        amount: ScaledAmount,
    ) -> VaultResult<SettlementTicket> {
        let auth = self.access.authorize(caller)?;
        let token = self.registry.resolve(symbol)?;
        Ok(self.bridge.deposit_to_core(&auth, token, amount)?)
    }

    /// Bring Core spot balance back to the EVM layer. Owner only.
    pub fn withdraw_from_core(
        &mut self,
        caller: Address,
        symbol: &str,
        amount: ScaledAmount,
        destination: Address,
    ) -> VaultResult<SettlementTicket> {
        let auth = self.access.authorize(caller)?;
        let token = self.registry.resolve(symbol)?;
        Ok(self
            .bridge
            .withdraw_from_core(&auth, token, amount, destination)?)
    }

    /// Move USD between Core spot and perp. Owner only.
    pub fn class_transfer(
        &mut self,
        caller: Address,
        amount: ScaledAmount,
        to_perp: bool,
    ) -> VaultResult<SettlementTicket> {
        let auth = self.access.authorize(caller)?;
        Ok(self.bridge.class_transfer(&auth, amount, to_perp)?)
    }

    /// Resolve a settlement ticket. Owner only.
    pub fn reconcile_settlement(
        &mut self,
        caller: Address,
        ticket_id: u64,
        outcome: SettlementOutcome,
    ) -> VaultResult<SettlementTicket> {
        let auth = self.access.authorize(caller)?;
        Ok(self.bridge.reconcile(&auth, ticket_id, outcome)?)
    }

    /// Owner only.
    pub fn place_limit_order(
        &mut self,
        caller: Address,
        order: OrderRequest,
    ) -> VaultResult<SubmittedOrder> {
        let auth = self.access.authorize(caller)?;
        Ok(self.trading.place_limit_order(&auth, order)?)
    }

    /// Owner only.
    pub fn spot_send(
        &mut self,
        caller: Address,
        symbol: &str,
        amount: ScaledAmount,
        destination: Address,
    ) -> VaultResult<u64> {
        let auth = self.access.authorize(caller)?;
        let token = self.registry.resolve(symbol)?;
        Ok(self.trading.spot_send(&auth, token, amount, destination)?)
    }

    /// Limit order on a configured spot pair, e.g. HYPE/USDC. Owner only.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        caller: Address,
        base: &str,
        quote: &str,
        side: OrderSide,
        price: Price,
        size: Size,
        time_in_force: TimeInForce,
    ) -> VaultResult<SubmittedOrder> {
        let auth = self.access.authorize(caller)?;
        Ok(self.trading.swap(
            &auth,
            &self.registry,
            base,
            quote,
            side,
            price,
            size,
            time_in_force,
        )?)
    }

    /// Let `wallet` sign Core actions for the vault. Owner only.
    pub fn add_api_wallet(
        &mut self,
        caller: Address,
        wallet: Address,
        name: &str,
    ) -> VaultResult<u64> {
        let auth = self.access.authorize(caller)?;
        Ok(self.trading.add_api_wallet(&auth, wallet, name)?)
    }

    /// Close every position. Owner only.
    pub fn close_all_positions(
        &mut self,
        caller: Address,
        positions: &[OpenPosition],
        policy: &ClosePolicy,
    ) -> VaultResult<CloseReport> {
        let auth = self.access.authorize(caller)?;
        Ok(self.trading.close_all_positions(&auth, positions, policy))
    }

    /// Record a reconciled total asset value. Owner only.
    ///
    /// This is where yield or loss is recognised; `verify_state` never
    /// calls it.
    pub fn report_total_assets(&mut self, caller: Address, new_total: U256) -> VaultResult<U256> {
        self.access.authorize(caller)?;
        Ok(self.ledger.apply_total_assets(new_total))
    }

    /// Register or update a token. Owner only.
    ///
    /// The deposit asset may be updated but keeps its Core token id, since
    /// custody is keyed by it.
    pub fn register_token(&mut self, caller: Address, token: TokenConfig) -> VaultResult<()> {
        self.access.authorize(caller)?;
        let is_asset = token.symbol.trim().eq_ignore_ascii_case(&self.asset.symbol);
        if is_asset && token.core_token_id != self.asset.core_token_id {
            return Err(RegistryError::InvalidConfig(format!(
                "deposit asset {} cannot move from token id {} to {}",
                self.asset.symbol, self.asset.core_token_id, token.core_token_id
            ))
            .into());
        }

        self.registry.register(token)?;
        if is_asset {
            self.asset = self.registry.resolve(&self.asset.symbol)?.clone();
        }
        Ok(())
    }

    /// Owner only.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> VaultResult<()> {
        let auth = self.access.authorize(caller)?;
        self.access.transfer_ownership(&auth, new_owner);
        info!(previous = %caller, %new_owner, "Ownership transferred");
        Ok(())
    }
}
