//! Bridge controller.
//!
//! Three movements are supported:
//! - EVM custody to Core spot (`deposit_to_core`), a transfer to the token's
//!   system address
//! - Core spot to EVM (`withdraw_from_core`), a spot send to the system
//!   address that lands in vault custody once settled
//! - Core spot to/from perp (`class_transfer`)
//!
//! Preconditions are checked before anything is handed to the sink. After a
//! successful submission the only state change is the custody debit for
//! deposits and a new settlement ticket.

use crate::custody::EvmCustody;
use crate::error::{BridgeError, BridgeResult};
use crate::settlement::{SettlementBook, SettlementOutcome, SettlementTicket};
use alloy_primitives::{Address, U256};
use hypervault_core::{
    BridgeTransfer, CoreAction, CoreError, DynCoreSink, EvmTransfer, Outbound, OwnerAuth,
    ScaledAmount, SubmitResult, SupportedToken, TokenConfig, TransferDirection,
};
use hypervault_registry::{system_address_for, AssetRegistry};
use tracing::{info, warn};

/// Convert `raw` between decimal precisions, truncating when narrowing.
pub fn rescale(raw: u64, from_decimals: u8, to_decimals: u8) -> BridgeResult<U256> {
    let value = U256::from(raw);
    if to_decimals >= from_decimals {
        let factor = U256::from(10u64).pow(U256::from(to_decimals - from_decimals));
        value
            .checked_mul(factor)
            .ok_or(BridgeError::Overflow("rescale"))
    } else {
        let factor = U256::from(10u64).pow(U256::from(from_decimals - to_decimals));
        Ok(value / factor)
    }
}

/// Moves vault value between layers.
pub struct BridgeController {
    sink: DynCoreSink,
    vault_address: Address,
    native_token_id: u64,
    usd_class_decimals: u8,
    /// Token credited by class transfers.
    usd_token: Option<TokenConfig>,
    custody: EvmCustody,
    settlements: SettlementBook,
}

impl BridgeController {
    pub fn new(sink: DynCoreSink, vault_address: Address, registry: &AssetRegistry) -> Self {
        Self {
            sink,
            vault_address,
            native_token_id: registry.native_token_id(),
            usd_class_decimals: registry.usd_class_decimals(),
            usd_token: registry.resolve_supported(SupportedToken::Usdc).ok().cloned(),
            custody: EvmCustody::new(),
            settlements: SettlementBook::new(),
        }
    }

    pub fn vault_address(&self) -> Address {
        self.vault_address
    }

    pub fn custody(&self) -> &EvmCustody {
        &self.custody
    }

    pub fn settlements(&self) -> &SettlementBook {
        &self.settlements
    }

    /// Fail if `receive` of `amount` would fail.
    pub fn check_receive(&self, token: &TokenConfig, amount: U256) -> BridgeResult<()> {
        self.custody.check_credit(token, amount).map(|_| ())
    }

    /// Record tokens received into vault custody (user deposits).
    pub fn receive(&mut self, token: &TokenConfig, amount: U256) -> BridgeResult<U256> {
        self.custody.credit(token, amount)
    }

    fn submit(&self, outbound: Outbound) -> BridgeResult<u64> {
        let label = outbound.to_string();
        match self.sink.submit(outbound) {
            SubmitResult::Submitted { submission_id } => Ok(submission_id),
            SubmitResult::Rejected(reason) => {
                warn!(outbound = %label, %reason, "Bridge submission rejected");
                Err(CoreError::SubmissionRejected(reason).into())
            }
        }
    }

    fn evm_transfer(&self, token: &TokenConfig, to: Address, amount: U256) -> EvmTransfer {
        EvmTransfer {
            symbol: token.symbol.clone(),
            token_contract: token.evm_address,
            to,
            amount,
            native: token.is_native(self.native_token_id),
        }
    }

    /// Send `amount` of `token` from custody to its system address.
    ///
    /// `amount` must be in the token's EVM decimals.
    pub fn deposit_to_core(
        &mut self,
        _auth: &OwnerAuth,
        token: &TokenConfig,
        amount: ScaledAmount,
    ) -> BridgeResult<SettlementTicket> {
        amount.require_decimals(token.decimals, "deposit_to_core")?;
        amount.require_non_zero()?;
        let value = U256::from(amount.raw());
        self.custody.ensure(token, value)?;

        let system_address = system_address_for(token.core_token_id, self.native_token_id);
        let transfer = self.evm_transfer(token, system_address, value);
        let submission_id = self.submit(Outbound::Transfer(transfer))?;
        let remaining = self.custody.debit(token, value)?;

        let ticket = self.settlements.open(
            BridgeTransfer {
                token: token.clone(),
                amount_scaled: amount.raw(),
                direction: TransferDirection::EvmToCore,
            },
            submission_id,
            None,
        );
        info!(
            ticket = ticket.id,
            token = %token,
            %amount,
            %system_address,
            %remaining,
            "Deposit to Core submitted"
        );
        Ok(ticket)
    }

    /// Spot-send `amount` back to the EVM layer.
    ///
    /// `amount` must be in the token's Core decimals. Funds reach vault
    /// custody when the ticket is reconciled; if `destination` is not the
    /// vault they are forwarded at that point.
    pub fn withdraw_from_core(
        &mut self,
        _auth: &OwnerAuth,
        token: &TokenConfig,
        amount: ScaledAmount,
        destination: Address,
    ) -> BridgeResult<SettlementTicket> {
        amount.require_decimals(token.core_decimals, "withdraw_from_core")?;
        amount.require_non_zero()?;
        if destination.is_zero() {
            return Err(BridgeError::InvalidDestination(destination));
        }

        let system_address = system_address_for(token.core_token_id, self.native_token_id);
        let action = CoreAction::SpotSend {
            destination: system_address,
            core_token_id: token.core_token_id,
            wei: amount.raw(),
        };
        let submission_id = self.submit(Outbound::Action(action))?;

        let ticket = self.settlements.open(
            BridgeTransfer {
                token: token.clone(),
                amount_scaled: amount.raw(),
                direction: TransferDirection::CoreToEvm,
            },
            submission_id,
            Some(destination),
        );
        info!(
            ticket = ticket.id,
            token = %token,
            %amount,
            %destination,
            "Withdrawal from Core submitted"
        );
        Ok(ticket)
    }

    /// Move USD between Core spot and perp balances.
    ///
    /// `amount` must carry the network's class-transfer decimals.
    pub fn class_transfer(
        &mut self,
        _auth: &OwnerAuth,
        amount: ScaledAmount,
        to_perp: bool,
    ) -> BridgeResult<SettlementTicket> {
        amount.require_decimals(self.usd_class_decimals, "class_transfer")?;
        amount.require_non_zero()?;
        let token = self
            .usd_token
            .clone()
            .ok_or_else(|| hypervault_registry::RegistryError::UnknownToken("USDC".to_string()))?;

        let action = CoreAction::UsdClassTransfer {
            ntl: amount.raw(),
            to_perp,
        };
        let submission_id = self.submit(Outbound::Action(action))?;

        let direction = TransferDirection::class(to_perp);
        let ticket = self.settlements.open(
            BridgeTransfer {
                token,
                amount_scaled: amount.raw(),
                direction,
            },
            submission_id,
            None,
        );
        info!(ticket = ticket.id, %amount, %direction, "Class transfer submitted");
        Ok(ticket)
    }

    /// Pass a settled withdrawal on to its destination.
    fn forward(
        &mut self,
        _auth: &OwnerAuth,
        token: &TokenConfig,
        amount: U256,
        to: Address,
    ) -> BridgeResult<U256> {
        self.release(token, amount, to)
    }

    /// Pay a depositor's redemption out of custody.
    ///
    /// Used by the vault after the share ledger has approved the withdrawal.
    pub fn release(&mut self, token: &TokenConfig, amount: U256, to: Address) -> BridgeResult<U256> {
        if amount.is_zero() {
            return Err(CoreError::ZeroAmount.into());
        }
        self.custody.ensure(token, amount)?;
        let transfer = self.evm_transfer(token, to, amount);
        self.submit(Outbound::Transfer(transfer))?;
        let remaining = self.custody.debit(token, amount)?;
        info!(token = %token, %amount, %to, %remaining, "Released from custody");
        Ok(remaining)
    }

    /// Resolve a ticket after checking Core state.
    ///
    /// A settled withdrawal credits custody with the amount converted to EVM
    /// decimals and forwards it when the destination is not the vault. A
    /// forwarding failure leaves the ticket reconciled and the funds in
    /// custody.
    pub fn reconcile(
        &mut self,
        auth: &OwnerAuth,
        ticket_id: u64,
        outcome: SettlementOutcome,
    ) -> BridgeResult<SettlementTicket> {
        let ticket = self.settlements.resolve(ticket_id, &outcome)?;

        match (&outcome, ticket.transfer.direction) {
            (SettlementOutcome::Settled, TransferDirection::CoreToEvm) => {
                let token = &ticket.transfer.token;
                let received = rescale(
                    ticket.transfer.amount_scaled,
                    token.core_decimals,
                    token.decimals,
                )?;
                self.custody.credit(token, received)?;
                info!(ticket = ticket.id, token = %token, %received, "Withdrawal settled into custody");

                if let Some(destination) = ticket.destination {
                    if destination != self.vault_address && !received.is_zero() {
                        self.forward(auth, token, received, destination)?;
                    }
                }
            }
            (SettlementOutcome::Settled, direction) => {
                info!(ticket = ticket.id, %direction, "Settlement reconciled");
            }
            (SettlementOutcome::Failed { reason }, direction) => {
                warn!(ticket = ticket.id, %direction, %reason, "Settlement failed");
            }
        }
        Ok(ticket)
    }
}
