//! Bridge transfer model.

use crate::token::TokenConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of value movement between the EVM layer and Core sub-ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    EvmToCore,
    CoreToEvm,
    SpotToPerp,
    PerpToSpot,
}

impl TransferDirection {
    /// Class transfer direction for a `to_perp` flag.
    pub fn class(to_perp: bool) -> Self {
        if to_perp {
            Self::SpotToPerp
        } else {
            Self::PerpToSpot
        }
    }
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvmToCore => write!(f, "evm->core"),
            Self::CoreToEvm => write!(f, "core->evm"),
            Self::SpotToPerp => write!(f, "spot->perp"),
            Self::PerpToSpot => write!(f, "perp->spot"),
        }
    }
}

/// A single bridge movement. Transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTransfer {
    pub token: TokenConfig,
    pub amount_scaled: u64,
    pub direction: TransferDirection,
}
