//! # Shell Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TROLLEY_INVENTORY_URL=http://inventory.local                       │
//! │     TROLLEY_REQUEST_TIMEOUT_SECS=5                                     │
//! │     TROLLEY_DB_PATH=/tmp/trolley.db                                    │
//! │     TROLLEY_CART_KEY=@trolley:cart                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else TROLLEY_CONFIG, else                         │
//! │     ~/.config/trolley/trolley.toml (Linux)                             │
//! │     ~/Library/Application Support/com.trolley.trolley/trolley.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! request_timeout_secs = 10
//!
//! [storage]
//! database_path = "/path/to/trolley.db"   # optional
//! cart_key = "@trolley:cart"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trolley_core::DEFAULT_CART_KEY;
use trolley_inventory::{InventoryConfig, InventoryError};

const CONFIG_FILE_NAME: &str = "trolley.toml";
const DATABASE_FILE_NAME: &str = "trolley.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "trolley", "trolley")
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart snapshot is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Key the cart snapshot is stored under.
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database_path: None,
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.trolley.trolley/trolley.db`
    /// - **Windows**: `%APPDATA%\trolley\trolley\data\trolley.db`
    /// - **Linux**: `~/.local/share/trolley/trolley.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(ConfigError::NoHomeDirectory)
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete shell configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (a missing default file is fine; a missing explicit one is not)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit = config_path.or_else(|| std::env::var_os("TROLLEY_CONFIG").map(PathBuf::from));

        let mut config = match &explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Applies `TROLLEY_*` overrides from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("TROLLEY_INVENTORY_URL") {
            debug!(url = %url, "Overriding inventory URL from environment");
            self.inventory.base_url = url;
        }

        if let Some(secs) = lookup("TROLLEY_REQUEST_TIMEOUT_SECS") {
            self.inventory.request_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TROLLEY_REQUEST_TIMEOUT_SECS".into()))?;
        }

        if let Some(path) = lookup("TROLLEY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("TROLLEY_CART_KEY") {
            self.storage.cart_key = key;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inventory.validate()?;

        if self.storage.cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue("storage.cart_key".into()));
        }

        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Could not determine a home directory for the database")]
    NoHomeDirectory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.inventory.base_url, "http://localhost:3333");
        assert_eq!(config.inventory.request_timeout_secs, 10);
        assert_eq!(config.storage.cart_key, DEFAULT_CART_KEY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [inventory]
            base_url = "http://inventory.local/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.base_url, "http://inventory.local/api");
        assert_eq!(config.inventory.request_timeout_secs, 10);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                ("TROLLEY_INVENTORY_URL", "https://inv.example"),
                ("TROLLEY_REQUEST_TIMEOUT_SECS", "0"),
                ("TROLLEY_DB_PATH", "/tmp/cart.db"),
                ("TROLLEY_CART_KEY", "kiosk-3"),
            ]))
            .unwrap();

        assert_eq!(config.inventory.base_url, "https://inv.example");
        assert_eq!(config.inventory.timeout(), None);
        assert_eq!(
            config.storage.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/cart.db")
        );
        assert_eq!(config.storage.cart_key, "kiosk-3");
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(env(&[("TROLLEY_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.storage.cart_key = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.inventory.base_url = "ws://localhost".into();
        assert!(matches!(config.validate(), Err(ConfigError::Inventory(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here/trolley.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[inventory]"));
        assert!(toml_str.contains("[storage]"));
    }
}
