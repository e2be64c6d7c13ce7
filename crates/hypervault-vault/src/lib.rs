//! Vault facade.
//!
//! Owns the share ledger, asset registry, bridge controller and trading
//! gateway, and is the only thing that mutates them. Depositor operations
//! are open to anyone; everything that moves custodied funds or trades is
//! owner-gated, with the owner check running before any other validation.

pub mod error;
pub mod queries;
pub mod vault;

pub use error::{VaultError, VaultResult};
pub use queries::VaultInfo;
pub use vault::Vault;
