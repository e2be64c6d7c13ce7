//! Per-depositor position record.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// One depositor's stake.
///
/// Created on first deposit and never removed: shares can fall to zero while
/// the withdrawal total keeps the history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPosition {
    pub shares: U256,
    /// Cost basis of the current shares: deposits in, less the pro-rata
    /// share released by each withdrawal.
    pub cumulative_deposit: U256,
    /// Sum of all assets paid out.
    pub cumulative_withdrawn: U256,
}

impl VaultPosition {
    pub fn is_active(&self) -> bool {
        !self.shares.is_zero()
    }
}
