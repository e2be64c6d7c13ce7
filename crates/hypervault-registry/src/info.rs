//! Info API response types.
//!
//! The info API is a read-only collaborator: it reports Core-side positions,
//! spot balances and mid prices as JSON with decimal strings. Raw types
//! mirror the wire format; `validate_*` functions turn them into typed
//! values and report malformed entries one by one.

use crate::error::InfoError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Margin summary from clearinghouseState.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarginSummary {
    /// Account value in USD.
    #[serde(rename = "accountValue")]
    pub account_value: String,
    /// Total notional position value.
    #[serde(rename = "totalNtlPos")]
    pub total_notional_position: String,
    #[serde(rename = "totalRawUsd")]
    pub total_raw_usd: String,
    #[serde(rename = "totalMarginUsed")]
    pub total_margin_used: String,
}

impl MarginSummary {
    pub fn account_value_decimal(&self) -> Result<Decimal, rust_decimal::Error> {
        self.account_value.parse()
    }
}

/// clearinghouseState response.
///
/// Endpoint: POST /info with `{"type": "clearinghouseState", "user": "<address>"}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClearinghouseStateResponse {
    #[serde(rename = "marginSummary")]
    pub margin_summary: Option<MarginSummary>,
    #[serde(rename = "crossMarginSummary")]
    pub cross_margin_summary: Option<MarginSummary>,
    /// Withdrawable balance.
    pub withdrawable: Option<String>,
    /// Open positions.
    #[serde(rename = "assetPositions", default)]
    pub asset_positions: Vec<AssetPositionEntry>,
    /// Timestamp in milliseconds.
    pub time: Option<u64>,
}

/// Asset position entry from clearinghouseState.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetPositionEntry {
    pub position: AssetPositionData,
    /// Position type ("oneWay").
    #[serde(rename = "type")]
    pub position_type: Option<String>,
}

/// Position data within AssetPositionEntry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetPositionData {
    /// Coin identifier (e.g., "BTC").
    pub coin: String,
    /// Position size (signed: positive = long, negative = short).
    pub szi: String,
    #[serde(rename = "entryPx")]
    pub entry_px: Option<String>,
    #[serde(rename = "positionValue")]
    pub position_value: Option<String>,
    #[serde(rename = "unrealizedPnl")]
    pub unrealized_pnl: Option<String>,
    #[serde(rename = "liquidationPx")]
    pub liquidation_px: Option<String>,
    pub leverage: Option<LeverageInfo>,
}

/// Leverage information.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeverageInfo {
    /// "cross" or "isolated".
    #[serde(rename = "type")]
    pub leverage_type: Option<String>,
    pub value: Option<u32>,
}

/// spotClearinghouseState response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotClearinghouseStateResponse {
    #[serde(default)]
    pub balances: Vec<RawSpotBalance>,
}

/// One spot balance entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSpotBalance {
    pub coin: String,
    /// Core token id.
    pub token: u64,
    pub total: String,
    #[serde(default)]
    pub hold: Option<String>,
    #[serde(rename = "entryNtl")]
    pub entry_ntl: Option<String>,
}

/// allMids response: coin to mid price string.
pub type RawAllMids = HashMap<String, String>;

/// Open perp position with parsed numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPosition {
    pub coin: String,
    /// Signed size: positive = long.
    pub size: Decimal,
    pub entry_price: Option<Decimal>,
    pub leverage: Option<u32>,
}

impl ValidatedPosition {
    pub fn is_long(&self) -> bool {
        self.size > Decimal::ZERO
    }
}

/// Spot balance with parsed numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotBalanceView {
    pub coin: String,
    pub token_id: u64,
    pub total: Decimal,
    pub hold: Decimal,
}

impl SpotBalanceView {
    /// Total minus amount held by resting orders.
    pub fn available(&self) -> Decimal {
        self.total - self.hold
    }
}

fn parse_field(coin: &str, field: &'static str, value: &str) -> Result<Decimal, InfoError> {
    Decimal::from_str(value.trim()).map_err(|_| InfoError::BadDecimal {
        coin: coin.to_string(),
        field,
        value: value.to_string(),
    })
}

fn parse_position(data: &AssetPositionData) -> Result<ValidatedPosition, InfoError> {
    let size = parse_field(&data.coin, "szi", &data.szi)?;
    let entry_price = data
        .entry_px
        .as_deref()
        .map(|px| parse_field(&data.coin, "entryPx", px))
        .transpose()?;

    Ok(ValidatedPosition {
        coin: data.coin.clone(),
        size,
        entry_price,
        leverage: data.leverage.as_ref().and_then(|l| l.value),
    })
}

/// Parse every open position. Zero-size entries are dropped.
pub fn validate_positions(
    state: &ClearinghouseStateResponse,
) -> (Vec<ValidatedPosition>, Vec<InfoError>) {
    let mut positions = Vec::new();
    let mut errors = Vec::new();

    for entry in &state.asset_positions {
        match parse_position(&entry.position) {
            Ok(position) if position.size.is_zero() => {}
            Ok(position) => positions.push(position),
            Err(e) => errors.push(e),
        }
    }

    (positions, errors)
}

/// Parse spot balances.
pub fn validate_spot_balances(
    state: &SpotClearinghouseStateResponse,
) -> (Vec<SpotBalanceView>, Vec<InfoError>) {
    let mut balances = Vec::new();
    let mut errors = Vec::new();

    for raw in &state.balances {
        let parsed = parse_field(&raw.coin, "total", &raw.total).and_then(|total| {
            let hold = match raw.hold.as_deref() {
                Some(hold) => parse_field(&raw.coin, "hold", hold)?,
                None => Decimal::ZERO,
            };
            Ok(SpotBalanceView {
                coin: raw.coin.clone(),
                token_id: raw.token,
                total,
                hold,
            })
        });
        match parsed {
            Ok(balance) => balances.push(balance),
            Err(e) => errors.push(e),
        }
    }

    (balances, errors)
}

/// Parse mid prices. Non-positive mids are reported as malformed.
pub fn parse_mids(raw: &RawAllMids) -> (HashMap<String, Decimal>, Vec<InfoError>) {
    let mut mids = HashMap::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (coin, value) in raw {
        match parse_field(coin, "mid", value) {
            Ok(mid) if mid > Decimal::ZERO => {
                mids.insert(coin.clone(), mid);
            }
            Ok(_) => errors.push(InfoError::BadDecimal {
                coin: coin.clone(),
                field: "mid",
                value: value.clone(),
            }),
            Err(e) => errors.push(e),
        }
    }

    (mids, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CLEARINGHOUSE: &str = r#"{
        "marginSummary": {
            "accountValue": "10000.50",
            "totalNtlPos": "5000.0",
            "totalRawUsd": "12000.0",
            "totalMarginUsed": "1000.0"
        },
        "withdrawable": "9000.5",
        "assetPositions": [
            {"type": "oneWay", "position": {"coin": "BTC", "szi": "0.05", "entryPx": "65000.0",
              "leverage": {"type": "cross", "value": 5}}},
            {"type": "oneWay", "position": {"coin": "ETH", "szi": "-1.2", "entryPx": null}},
            {"type": "oneWay", "position": {"coin": "SOL", "szi": "abc"}},
            {"type": "oneWay", "position": {"coin": "APT", "szi": "0.0"}}
        ],
        "time": 1700000000000
    }"#;

    #[test]
    fn test_validate_positions() {
        let state: ClearinghouseStateResponse = serde_json::from_str(CLEARINGHOUSE).unwrap();
        let (positions, errors) = validate_positions(&state);

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].coin, "BTC");
        assert_eq!(positions[0].size, dec!(0.05));
        assert_eq!(positions[0].entry_price, Some(dec!(65000.0)));
        assert_eq!(positions[0].leverage, Some(5));
        assert!(positions[0].is_long());
        assert!(!positions[1].is_long());
        assert_eq!(positions[1].entry_price, None);

        assert_eq!(
            errors,
            vec![InfoError::BadDecimal {
                coin: "SOL".to_string(),
                field: "szi",
                value: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_margin_summary_parsing() {
        let state: ClearinghouseStateResponse = serde_json::from_str(CLEARINGHOUSE).unwrap();
        let summary = state.margin_summary.unwrap();
        assert_eq!(summary.account_value_decimal().unwrap(), dec!(10000.50));
    }

    #[test]
    fn test_empty_clearinghouse_state() {
        let state: ClearinghouseStateResponse = serde_json::from_str("{}").unwrap();
        let (positions, errors) = validate_positions(&state);
        assert!(positions.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validate_spot_balances() {
        let json = r#"{"balances": [
            {"coin": "USDC", "token": 0, "total": "125.5", "hold": "25.5", "entryNtl": "0.0"},
            {"coin": "HYPE", "token": 135, "total": "2.0"},
            {"coin": "BAD", "token": 9, "total": "1", "hold": "x"}
        ]}"#;
        let state: SpotClearinghouseStateResponse = serde_json::from_str(json).unwrap();
        let (balances, errors) = validate_spot_balances(&state);

        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].available(), dec!(100.0));
        assert_eq!(balances[1].hold, Decimal::ZERO);
        assert_eq!(balances[1].token_id, 135);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_mids() {
        let raw: RawAllMids = serde_json::from_str(
            r#"{"BTC": "65000.5", "ETH": "3200", "ZERO": "0", "NAN": "not-a-number"}"#,
        )
        .unwrap();
        let (mids, errors) = parse_mids(&raw);

        assert_eq!(mids.get("BTC"), Some(&dec!(65000.5)));
        assert_eq!(mids.get("ETH"), Some(&dec!(3200)));
        assert_eq!(mids.len(), 2);
        assert_eq!(errors.len(), 2);
    }
}
