//! Asset registry and Core boundary data for the hypervault.
//!
//! Maps logical tokens to their EVM contracts, decimals and Core token ids,
//! derives system addresses, and validates read-only snapshots returned by
//! the external info API.
//!
//! A registry is always built from one [`NetworkConfig`]; there is no global
//! token table, so testnet and mainnet registries can coexist.

pub mod client;
pub mod error;
pub mod info;
pub mod network;
pub mod registry;
pub mod system_address;

pub use client::InfoClient;
pub use error::{InfoError, RegistryError, RegistryResult};
pub use info::{
    parse_mids, validate_positions, validate_spot_balances, AssetPositionData, AssetPositionEntry,
    ClearinghouseStateResponse, LeverageInfo, MarginSummary, RawAllMids, RawSpotBalance,
    SpotBalanceView, SpotClearinghouseStateResponse, ValidatedPosition,
};
pub use network::{NetworkConfig, PerpAsset, SpotPair};
pub use registry::AssetRegistry;
pub use system_address::{format_system_address, system_address_for, NATIVE_SYSTEM_ADDRESS};
