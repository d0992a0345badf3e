//! # Inventory Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Status                 │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  DecodeFailed           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session maps every variant onto a `CartError` that carries only the
//! display string; callers that want the category inspect it here first.

use thiserror::Error;

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory client failures.
#[derive(Debug, Error)]
pub enum InventoryError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid inventory configuration: {0}")]
    InvalidConfig(String),

    /// Base URL could not be parsed or joined.
    #[error("Invalid inventory URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got a response.
    ///
    /// ## When This Occurs
    /// - Service is down or unreachable
    /// - DNS failure
    /// - TLS handshake failure
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request exceeded the configured timeout.
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The service answered with a non-success status.
    #[error("Inventory service returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not the expected JSON shape.
    #[error("Failed to decode inventory response: {0}")]
    DecodeFailed(String),
}

impl InventoryError {
    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            InventoryError::ConnectionFailed(_) | InventoryError::Timeout(_) => true,
            InventoryError::Status { status, .. } => *status >= 500,
            InventoryError::InvalidConfig(_)
            | InventoryError::InvalidUrl(_)
            | InventoryError::DecodeFailed(_) => false,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for InventoryError {
    fn from(err: url::ParseError) -> Self {
        InventoryError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::DecodeFailed(err.to_string())
    }
}

/// Convert reqwest errors to InventoryError.
///
/// Timeouts are mapped by the client itself, which knows the configured
/// duration.
impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return InventoryError::DecodeFailed(err.to_string());
        }
        if let Some(status) = err.status() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            return InventoryError::Status {
                status: status.as_u16(),
                url,
            };
        }
        InventoryError::ConnectionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(InventoryError::Timeout(10).is_retryable());
        assert!(InventoryError::ConnectionFailed("refused".into()).is_retryable());
        assert!(InventoryError::Status {
            status: 503,
            url: "http://x/stock/1".into()
        }
        .is_retryable());

        assert!(!InventoryError::Status {
            status: 400,
            url: "http://x/stock/1".into()
        }
        .is_retryable());
        assert!(!InventoryError::DecodeFailed("eof".into()).is_retryable());
    }

    #[test]
    fn test_url_parse_conversion() {
        let err: InventoryError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, InventoryError::InvalidUrl(_)));
    }

    #[test]
    fn test_display() {
        let err = InventoryError::Status {
            status: 500,
            url: "http://inv/products/7".into(),
        };
        assert_eq!(
            err.to_string(),
            "Inventory service returned 500 for http://inv/products/7"
        );
    }
}
