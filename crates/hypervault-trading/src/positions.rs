//! Open positions known to the vault.

use crate::error::{TradingError, TradingResult};
use crate::close::CloseFailure;
use hypervault_core::{Price, Size};
use hypervault_registry::{AssetRegistry, ValidatedPosition};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A Core perp position with the price used to close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPosition {
    pub coin: String,
    pub core_asset_id: u32,
    /// Signed size: positive = long.
    pub size: Size,
    /// Reference price (mid, or entry if no mid is known).
    pub reference_price: Price,
}

impl OpenPosition {
    pub fn is_long(&self) -> bool {
        self.size.inner() > Decimal::ZERO
    }

    /// Resolve asset id and reference price for one position.
    pub fn from_validated(
        position: &ValidatedPosition,
        mids: &HashMap<String, Decimal>,
        registry: &AssetRegistry,
    ) -> TradingResult<Self> {
        let core_asset_id = registry.perp_asset_id(&position.coin)?;
        let price = mids
            .get(&position.coin)
            .copied()
            .or(position.entry_price)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| TradingError::MissingPrice(position.coin.clone()))?;

        Ok(Self {
            coin: position.coin.clone(),
            core_asset_id,
            size: Size::new(position.size),
            reference_price: Price::new(price),
        })
    }
}

/// Resolve every position; unresolvable ones are returned as failures.
pub fn resolve_positions(
    positions: &[ValidatedPosition],
    mids: &HashMap<String, Decimal>,
    registry: &AssetRegistry,
) -> (Vec<OpenPosition>, Vec<CloseFailure>) {
    let mut open = Vec::new();
    let mut failures = Vec::new();

    for position in positions {
        match OpenPosition::from_validated(position, mids, registry) {
            Ok(p) => open.push(p),
            Err(e) => failures.push(CloseFailure {
                coin: position.coin.clone(),
                reason: e.to_string(),
            }),
        }
    }

    (open, failures)
}
