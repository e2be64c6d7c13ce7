//! Read-only helpers behind the CLI subcommands.
//!
//! Nothing here talks to Core. `close_plan` runs the close-all batch
//! against a [`RecordingSink`] so the operator can inspect the encoded
//! actions before anything is emitted.

use crate::error::AppResult;
use alloy_primitives::Address;
use hypervault_core::{scale, unscale, AccessControl, CoreAction, RecordingSink};
use hypervault_registry::{
    format_system_address, AssetRegistry, InfoError, RawAllMids, ValidatedPosition,
};
use hypervault_trading::{resolve_positions, ClosePolicy, CloseReport, TradingGateway};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// One row of the token table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    pub symbol: String,
    pub core_token_id: u64,
    pub decimals: u8,
    pub core_decimals: u8,
    pub evm_address: String,
    pub system_address: String,
}

/// Every registered token with its system address, ordered by token id.
pub fn token_table(registry: &AssetRegistry) -> Vec<TokenRow> {
    let mut rows: Vec<TokenRow> = registry
        .tokens()
        .into_iter()
        .map(|token| TokenRow {
            symbol: token.symbol.clone(),
            core_token_id: token.core_token_id,
            decimals: token.decimals,
            core_decimals: token.core_decimals,
            evm_address: format_system_address(&token.evm_address),
            system_address: format_system_address(&registry.system_address(token)),
        })
        .collect();
    rows.sort_by_key(|row| row.core_token_id);
    rows
}

/// System address for a symbol or a numeric token id.
pub fn system_address(registry: &AssetRegistry, token: &str) -> AppResult<Address> {
    let config = match token.parse::<u64>() {
        Ok(id) => registry.by_token_id(id)?,
        Err(_) => registry.resolve(token)?,
    };
    Ok(registry.system_address(config))
}

/// Human amount to integer at `decimals`.
pub fn scale_amount(amount: Decimal, decimals: u8) -> AppResult<u64> {
    Ok(scale(amount, decimals)?)
}

/// Integer at `decimals` to human amount.
pub fn unscale_amount(raw: u64, decimals: u8) -> Decimal {
    unscale(raw, decimals)
}

/// One encoded close order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub coin: String,
    pub is_buy: bool,
    pub limit_price_scaled: u64,
    pub size_scaled: u64,
    pub raw: String,
}

/// Result of a close-all dry run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClosePlan {
    pub actions: Vec<PlannedAction>,
    pub failures: Vec<(String, String)>,
}

impl ClosePlan {
    fn from_report(report: &CloseReport) -> Self {
        let actions = report
            .submitted
            .iter()
            .map(|closed| PlannedAction {
                coin: closed.coin.clone(),
                is_buy: closed.order.is_buy,
                limit_price_scaled: closed.order.limit_price_scaled,
                size_scaled: closed.order.size_scaled,
                raw: CoreAction::LimitOrder(closed.order).encode_hex(),
            })
            .collect();
        let failures = report
            .failures
            .iter()
            .map(|f| (f.coin.clone(), f.reason.clone()))
            .collect();
        Self { actions, failures }
    }
}

/// Build the close-all batch for `positions` without emitting anything.
pub fn close_plan(
    registry: &AssetRegistry,
    owner: Address,
    positions: &[ValidatedPosition],
    raw_mids: &RawAllMids,
    policy: &ClosePolicy,
) -> AppResult<ClosePlan> {
    let (mids, mid_errors) = hypervault_registry::parse_mids(raw_mids);
    log_info_errors(&mid_errors);

    let (open, unresolved) = resolve_positions(positions, &mids, registry);

    let auth = AccessControl::new(owner).authorize(owner)?;
    let gateway = TradingGateway::new(Arc::new(RecordingSink::new()));
    let mut report = gateway.close_all_positions(&auth, &open, policy);
    report.extend_failures(unresolved);

    Ok(ClosePlan::from_report(&report))
}

/// Log malformed info API entries.
pub fn log_info_errors(errors: &[InfoError]) {
    for e in errors {
        warn!(error = %e, "Skipping malformed info entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypervault_registry::NetworkConfig;
    use rust_decimal_macros::dec;

    fn registry() -> AssetRegistry {
        AssetRegistry::from_config(&NetworkConfig::testnet()).unwrap()
    }

    fn position(coin: &str, size: Decimal, entry: Option<Decimal>) -> ValidatedPosition {
        ValidatedPosition {
            coin: coin.to_string(),
            size,
            entry_price: entry,
            leverage: None,
        }
    }

    #[test]
    fn test_token_table_sorted() {
        let rows = token_table(&registry());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "USDC");
        assert_eq!(
            rows[0].system_address,
            "0x2000000000000000000000000000000000000000"
        );
        assert_eq!(rows[1].symbol, "HYPE");
        assert_eq!(
            rows[1].system_address,
            "0x2222222222222222222222222222222222222222"
        );
    }

    #[test]
    fn test_system_address_by_symbol_and_id() {
        let registry = registry();
        assert_eq!(
            system_address(&registry, "usdc").unwrap(),
            system_address(&registry, "0").unwrap()
        );
        assert!(system_address(&registry, "DOGE").is_err());
        assert!(system_address(&registry, "999").is_err());
    }

    #[test]
    fn test_scale_helpers() {
        assert_eq!(scale_amount(dec!(1.5), 8).unwrap(), 150_000_000);
        assert_eq!(unscale_amount(150_000_000, 8), dec!(1.5));
        assert!(scale_amount(dec!(-1), 8).is_err());
    }

    #[test]
    fn test_close_plan_builds_orders() {
        let registry = registry();
        let owner = Address::repeat_byte(0x33);
        let positions = vec![
            position("BTC", dec!(0.5), Some(dec!(60000))),
            position("ETH", dec!(-2), Some(dec!(3000))),
            position("DOGE", dec!(100), Some(dec!(0.1))),
        ];
        let mut mids = RawAllMids::new();
        mids.insert("BTC".to_string(), "61000".to_string());

        let plan = close_plan(&registry, owner, &positions, &mids, &ClosePolicy::default()).unwrap();

        assert_eq!(plan.actions.len(), 2);
        let btc = &plan.actions[0];
        assert_eq!(btc.coin, "BTC");
        assert!(!btc.is_buy);
        // 61000 * 0.99 at 8 decimals
        assert_eq!(btc.limit_price_scaled, 6_039_000_000_000);
        assert!(btc.raw.starts_with("0x01000001"));

        let eth = &plan.actions[1];
        assert!(eth.is_buy);
        // no mid: entry 3000 * 1.01
        assert_eq!(eth.limit_price_scaled, 303_000_000_000);
        assert_eq!(eth.size_scaled, 200_000_000);

        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.failures[0].0, "DOGE");
    }
}
