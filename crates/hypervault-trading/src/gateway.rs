//! Trading gateway.
//!
//! A pass-through with input validation: the gateway cannot see Core
//! positions, so reduce-only is enforced by Core, not here.

use crate::close::{close_order_for, ClosePolicy, CloseFailure, CloseReport, ClosedOrder};
use crate::error::{TradingError, TradingResult};
use crate::positions::OpenPosition;
use alloy_primitives::Address;
use hypervault_core::{
    ClientOrderId, CoreAction, CoreError, DynCoreSink, OrderRequest, OrderSide, Outbound,
    OwnerAuth, Price, ScaledAmount, Size, SubmitResult, TimeInForce, TokenConfig,
};
use hypervault_registry::AssetRegistry;
use tracing::{error, info, warn};

/// An order accepted by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedOrder {
    pub order: OrderRequest,
    pub submission_id: u64,
}

/// Build an order from human-readable price and size (scaled by 1e8).
pub fn order_from_human(
    core_asset_id: u32,
    side: OrderSide,
    price: Price,
    size: Size,
    reduce_only: bool,
    time_in_force: TimeInForce,
) -> TradingResult<OrderRequest> {
    Ok(OrderRequest {
        core_asset_id,
        is_buy: side.is_buy(),
        limit_price_scaled: price.to_scaled()?,
        size_scaled: size.to_scaled()?,
        reduce_only,
        time_in_force,
        client_order_id: ClientOrderId::generate(),
    })
}

/// Submits trading actions to Core.
pub struct TradingGateway {
    sink: DynCoreSink,
}

impl TradingGateway {
    pub fn new(sink: DynCoreSink) -> Self {
        Self { sink }
    }

    fn validate(order: &OrderRequest) -> TradingResult<()> {
        if order.size_scaled == 0 {
            return Err(TradingError::InvalidOrder("size must be positive".to_string()));
        }
        if order.limit_price_scaled == 0 {
            return Err(TradingError::InvalidOrder(
                "limit price must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn submit(&self, outbound: Outbound) -> TradingResult<u64> {
        match self.sink.submit(outbound) {
            SubmitResult::Submitted { submission_id } => Ok(submission_id),
            SubmitResult::Rejected(reason) => Err(CoreError::SubmissionRejected(reason).into()),
        }
    }

    /// Validate and submit a limit order.
    pub fn place_limit_order(
        &self,
        _auth: &OwnerAuth,
        order: OrderRequest,
    ) -> TradingResult<SubmittedOrder> {
        Self::validate(&order)?;
        let submission_id = self.submit(Outbound::Action(CoreAction::LimitOrder(order)))?;
        info!(%order, submission_id, "Limit order submitted");
        Ok(SubmittedOrder {
            order,
            submission_id,
        })
    }

    /// Move Core spot balance to `destination`.
    ///
    /// `amount` must be in the token's Core decimals.
    pub fn spot_send(
        &self,
        _auth: &OwnerAuth,
        token: &TokenConfig,
        amount: ScaledAmount,
        destination: Address,
    ) -> TradingResult<u64> {
        amount.require_decimals(token.core_decimals, "spot_send")?;
        amount.require_non_zero()?;
        if destination.is_zero() {
            return Err(TradingError::InvalidOrder(
                "spot send destination is the zero address".to_string(),
            ));
        }

        let submission_id = self.submit(Outbound::Action(CoreAction::SpotSend {
            destination,
            core_token_id: token.core_token_id,
            wei: amount.raw(),
        }))?;
        info!(token = %token, %amount, %destination, submission_id, "Spot send submitted");
        Ok(submission_id)
    }

    /// Authorise an API wallet to trade for the vault.
    pub fn add_api_wallet(
        &self,
        _auth: &OwnerAuth,
        wallet: Address,
        name: &str,
    ) -> TradingResult<u64> {
        if wallet.is_zero() {
            return Err(TradingError::InvalidOrder(
                "API wallet is the zero address".to_string(),
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(TradingError::InvalidOrder("API wallet name is empty".to_string()));
        }

        let submission_id = self.submit(Outbound::Action(CoreAction::AddApiWallet {
            wallet,
            name: name.to_string(),
        }))?;
        info!(%wallet, name, submission_id, "API wallet submitted");
        Ok(submission_id)
    }

    /// Limit order on a configured spot pair.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &self,
        auth: &OwnerAuth,
        registry: &AssetRegistry,
        base: &str,
        quote: &str,
        side: OrderSide,
        price: Price,
        size: Size,
        time_in_force: TimeInForce,
    ) -> TradingResult<SubmittedOrder> {
        let pair = registry
            .spot_pair(base, quote)
            .ok_or_else(|| TradingError::UnknownPair(format!("{base}/{quote}")))?;
        let order = order_from_human(pair.asset_id, side, price, size, false, time_in_force)?;
        self.place_limit_order(auth, order)
    }

    /// Close every position with a reduce-only crossing order.
    ///
    /// Failures are recorded per position; the remaining positions are
    /// still closed.
    pub fn close_all_positions(
        &self,
        auth: &OwnerAuth,
        positions: &[OpenPosition],
        policy: &ClosePolicy,
    ) -> CloseReport {
        let mut report = CloseReport::default();

        for position in positions {
            let result = close_order_for(position, policy)
                .and_then(|order| self.place_limit_order(auth, order));
            match result {
                Ok(submitted) => report.submitted.push(ClosedOrder {
                    coin: position.coin.clone(),
                    order: submitted.order,
                    submission_id: submitted.submission_id,
                }),
                Err(e) => {
                    error!(coin = %position.coin, error = %e, "Failed to close position");
                    report.failures.push(CloseFailure {
                        coin: position.coin.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.all_succeeded() {
            info!(closed = report.submitted.len(), "Close-all submitted");
        } else {
            warn!(
                closed = report.submitted.len(),
                failed = report.failure_count(),
                "Close-all finished with failures"
            );
        }
        report
    }
}
