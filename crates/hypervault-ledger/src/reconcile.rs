//! Ledger versus external state comparison.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of comparing the ledger's share count with an external reading.
///
/// Divergence is reported, never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReport {
    pub in_sync: bool,
    /// What the ledger believes.
    pub internal: U256,
    /// What the external source reports.
    pub external: U256,
}

impl StateReport {
    pub fn new(internal: U256, external: U256) -> Self {
        Self {
            in_sync: internal == external,
            internal,
            external,
        }
    }

    /// Amount the external reading falls short of the ledger.
    pub fn shortfall(&self) -> U256 {
        self.internal.saturating_sub(self.external)
    }

    /// Amount the external reading exceeds the ledger.
    pub fn surplus(&self) -> U256 {
        self.external.saturating_sub(self.internal)
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_sync {
            write!(f, "in sync ({})", self.internal)
        } else {
            write!(
                f,
                "DIVERGED internal={} external={}",
                self.internal, self.external
            )
        }
    }
}
