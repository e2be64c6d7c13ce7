//! Close-all policy.
//!
//! Each open position becomes a reduce-only order in the opposite direction,
//! priced off the reference price by a fixed adjustment so it crosses the
//! book. Positions are closed independently: one failure is recorded and
//! the batch continues.

use crate::error::{TradingError, TradingResult};
use crate::positions::OpenPosition;
use hypervault_core::{ClientOrderId, OrderRequest, TimeInForce};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Pricing for closing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePolicy {
    /// Multiplier applied when selling to close a long.
    pub long_adjustment: Decimal,
    /// Multiplier applied when buying to close a short.
    pub short_adjustment: Decimal,
    pub time_in_force: TimeInForce,
}

impl Default for ClosePolicy {
    fn default() -> Self {
        Self {
            long_adjustment: dec!(0.99),
            short_adjustment: dec!(1.01),
            time_in_force: TimeInForce::ImmediateOrCancel,
        }
    }
}

/// A close order accepted by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedOrder {
    pub coin: String,
    pub order: OrderRequest,
    pub submission_id: u64,
}

/// A position that could not be closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseFailure {
    pub coin: String,
    pub reason: String,
}

/// Outcome of a close-all batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseReport {
    pub submitted: Vec<ClosedOrder>,
    pub failures: Vec<CloseFailure>,
}

impl CloseReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Add failures found before submission (e.g., unresolvable positions).
    pub fn extend_failures(&mut self, failures: impl IntoIterator<Item = CloseFailure>) {
        self.failures.extend(failures);
    }
}

/// Closing order for one position.
pub fn close_order_for(position: &OpenPosition, policy: &ClosePolicy) -> TradingResult<OrderRequest> {
    if position.size.is_zero() {
        return Err(TradingError::InvalidOrder(format!(
            "{}: position size is zero",
            position.coin
        )));
    }

    let is_long = position.is_long();
    let adjustment = if is_long {
        policy.long_adjustment
    } else {
        policy.short_adjustment
    };
    let execution_price = position
        .reference_price
        .checked_mul(adjustment)
        .ok_or_else(|| {
            TradingError::InvalidOrder(format!(
                "{}: close price {} x {} overflows",
                position.coin, position.reference_price, adjustment
            ))
        })?;

    Ok(OrderRequest {
        core_asset_id: position.core_asset_id,
        is_buy: !is_long,
        limit_price_scaled: execution_price.to_scaled()?,
        size_scaled: position.size.abs().to_scaled()?,
        reduce_only: true,
        time_in_force: policy.time_in_force,
        client_order_id: ClientOrderId::NONE,
    })
}
