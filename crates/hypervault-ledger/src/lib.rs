//! Share ledger for the hypervault.
//!
//! Tracks per-depositor shares against a single `total_assets` figure.
//! `total_assets` is the ledger's belief about what the vault holds; it is
//! only changed by deposits, withdrawals and explicit owner reports, never
//! by reading a balance. Every rounding decision favours the vault.

pub mod error;
pub mod ledger;
pub mod math;
pub mod position;
pub mod reconcile;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{ShareLedger, PRICE_PER_SHARE_SCALE, YIELD_PERCENT_SCALE};
pub use math::{mul_div, Rounding};
pub use position::VaultPosition;
pub use reconcile::StateReport;
