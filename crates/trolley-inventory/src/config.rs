//! # Inventory Configuration
//!
//! ```toml
//! [inventory]
//! base_url = "http://localhost:3333"
//! request_timeout_secs = 10   # 0 disables the timeout
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{InventoryError, InventoryResult};

/// Default inventory service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Inventory client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Service root. `stock/{id}` and `products/{id}` are resolved against it.
    pub base_url: String,

    /// Per-request timeout in seconds. 0 means no timeout.
    pub request_timeout_secs: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl InventoryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        InventoryConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Returns the timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Parses the base URL, forcing a trailing slash so relative joins keep
    /// any path prefix (`http://host/api` + `stock/1` → `http://host/api/stock/1`).
    pub fn parsed_base_url(&self) -> InventoryResult<Url> {
        let mut url = Url::parse(self.base_url.trim())?;

        if url.cannot_be_a_base() {
            return Err(InventoryError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                self.base_url
            )));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(InventoryError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> InventoryResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(InventoryError::InvalidConfig(
                "base_url must not be empty".to_string(),
            ));
        }
        self.parsed_base_url().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = InventoryConfig::default().request_timeout_secs(0);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let config = InventoryConfig::new("http://inventory.local/api");
        let base = config.parsed_base_url().unwrap();
        assert_eq!(
            base.join("stock/4").unwrap().as_str(),
            "http://inventory.local/api/stock/4"
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            InventoryConfig::new("").validate(),
            Err(InventoryError::InvalidConfig(_))
        ));
        assert!(matches!(
            InventoryConfig::new("ftp://inventory.local").validate(),
            Err(InventoryError::InvalidUrl(_))
        ));
        assert!(matches!(
            InventoryConfig::new("localhost:3333").validate(),
            Err(InventoryError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: InventoryConfig = serde_json::from_str(r#"{"base_url":"http://x"}"#).unwrap();
        assert_eq!(config.base_url, "http://x");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
