//! Application configuration.

use crate::error::{AppError, AppResult};
use alloy_primitives::Address;
use hypervault_registry::{AssetRegistry, NetworkConfig};
use hypervault_trading::ClosePolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "HYPERVAULT_CONFIG";

/// Used when neither the flag nor the environment variable is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

/// Configuration path: CLI flag > environment variable > default.
pub fn resolve_config_path(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network TOML file. Relative paths are resolved against the
    /// directory of the application config.
    pub network_file: PathBuf,
    /// Address whose Core state the tooling inspects.
    pub vault_address: Address,
    /// Vault owner, used to authorize dry-run submissions.
    pub owner: Address,
    #[serde(default)]
    pub close_policy: ClosePolicy,
    /// Set when loaded from disk.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.owner == Address::ZERO {
            return Err(AppError::Config("owner must be non-zero".to_string()));
        }
        if self.vault_address == Address::ZERO {
            return Err(AppError::Config("vault_address must be non-zero".to_string()));
        }

        let policy = &self.close_policy;
        if policy.long_adjustment <= Decimal::ZERO || policy.long_adjustment >= Decimal::ONE {
            return Err(AppError::Config(format!(
                "close_policy.long_adjustment must be in (0, 1), got {}",
                policy.long_adjustment
            )));
        }
        if policy.short_adjustment <= Decimal::ONE {
            return Err(AppError::Config(format!(
                "close_policy.short_adjustment must be above 1, got {}",
                policy.short_adjustment
            )));
        }
        Ok(())
    }

    /// Path of the network file after resolution.
    pub fn network_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) if self.network_file.is_relative() => base.join(&self.network_file),
            _ => self.network_file.clone(),
        }
    }

    /// Load the network configuration and build its registry.
    pub fn load_registry(&self) -> AppResult<(NetworkConfig, AssetRegistry)> {
        let network = NetworkConfig::from_file(self.network_path())?;
        let registry = AssetRegistry::from_config(&network)?;
        info!(
            network = %network.network,
            vault = %self.vault_address,
            "Registry ready"
        );
        Ok((network, registry))
    }
}
