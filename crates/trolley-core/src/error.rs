//! # Error Types
//!
//! Domain-specific error types for trolley-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  trolley-core errors (this file)                                       │
//! │  ├── CartError      - Why a cart operation did not commit              │
//! │  └── SnapshotError  - Why a stored snapshot cannot be hydrated         │
//! │                                                                         │
//! │  trolley-store errors (separate crate)                                 │
//! │  └── StoreError     - Key-value store failures                         │
//! │                                                                         │
//! │  trolley-inventory errors (separate crate)                             │
//! │  └── InventoryError - Stock/catalog query failures                     │
//! │                                                                         │
//! │  Flow: InventoryError → CartError → NotificationSink → shopper         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. One variant per failure cause, never a catch-all
//! 2. Include the product id in every variant
//! 3. The user-facing message depends on the cause AND the operation, see
//!    [`CartError::notification`]

use std::fmt;

use thiserror::Error;

use crate::types::ProductId;
use crate::OUT_OF_STOCK_MESSAGE;

// =============================================================================
// Operation
// =============================================================================

/// The three mutating cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    /// Generic message reported when this operation fails for any reason
    /// other than stock.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Operation::Add => "Error adding product",
            Operation::Remove => "Error removing product",
            Operation::UpdateAmount => "Error updating product amount",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add_product"),
            Operation::Remove => write!(f, "remove_product"),
            Operation::UpdateAmount => write!(f, "update_product_amount"),
        }
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Reasons a cart operation leaves the cart unchanged.
///
/// None of these are fatal. The engine reports them through the notification
/// sink and hands them back to the caller for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The stock query failed (network, decoding, timeout).
    #[error("Stock query failed for product {product_id}: {reason}")]
    StockQueryFailed { product_id: ProductId, reason: String },

    /// The catalog query for a first-time add failed.
    #[error("Product details query failed for product {product_id}: {reason}")]
    ProductMetadataFailed { product_id: ProductId, reason: String },

    /// The requested quantity exceeds available stock.
    ///
    /// ## When This Occurs
    /// ```text
    /// stock record missing        → available = 0
    /// stock amount == 0           → available = 0
    /// add with amount >= stock    → requested = amount + 1
    /// update with amount > stock  → requested = amount
    /// ```
    #[error("Product {product_id} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Remove or update targeted a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// An amount below 1 was requested. Ignored without notifying the user.
    #[error("Requested amount {amount} for product {product_id} is below 1")]
    InvalidAmountRequested { product_id: ProductId, amount: i64 },
}

impl CartError {
    /// Returns the message to show the shopper when `operation` fails with
    /// this error, or `None` when the failure is silent.
    pub fn notification(&self, operation: Operation) -> Option<&'static str> {
        match self {
            CartError::OutOfStock { .. } => Some(OUT_OF_STOCK_MESSAGE),
            CartError::InvalidAmountRequested { .. } => None,
            CartError::StockQueryFailed { .. }
            | CartError::ProductMetadataFailed { .. }
            | CartError::ProductNotInCart(_) => Some(operation.failure_message()),
        }
    }

    /// Returns true if the failure is never reported to the shopper.
    pub fn is_silent(&self) -> bool {
        matches!(self, CartError::InvalidAmountRequested { .. })
    }

    /// Returns true if the failure came from the inventory service rather
    /// than from the cart's own rules.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CartError::StockQueryFailed { .. } | CartError::ProductMetadataFailed { .. }
        )
    }

    /// The product the failed operation targeted.
    pub fn product_id(&self) -> ProductId {
        match self {
            CartError::StockQueryFailed { product_id, .. }
            | CartError::ProductMetadataFailed { product_id, .. }
            | CartError::OutOfStock { product_id, .. }
            | CartError::InvalidAmountRequested { product_id, .. } => *product_id,
            CartError::ProductNotInCart(product_id) => *product_id,
        }
    }
}

// =============================================================================
// Snapshot Error
// =============================================================================

/// A stored snapshot that cannot become the session's cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Not a JSON array of line items.
    #[error("Malformed cart snapshot: {0}")]
    Malformed(String),

    /// Cart could not be encoded.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(String),

    /// The same product appears twice.
    #[error("Product {0} appears more than once in the snapshot")]
    DuplicateProduct(ProductId),

    /// A line item with amount 0.
    #[error("Product {0} has amount 0 in the snapshot")]
    ZeroAmount(ProductId),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(3),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Product 3 out of stock: requested 6, available 5"
        );
        assert_eq!(
            CartError::ProductNotInCart(ProductId::new(9)).to_string(),
            "Product 9 is not in the cart"
        );
    }

    #[test]
    fn test_notification_depends_on_operation() {
        let err = CartError::StockQueryFailed {
            product_id: ProductId::new(1),
            reason: "connection refused".into(),
        };
        assert_eq!(err.notification(Operation::Add), Some("Error adding product"));
        assert_eq!(
            err.notification(Operation::UpdateAmount),
            Some("Error updating product amount")
        );

        let err = CartError::ProductNotInCart(ProductId::new(1));
        assert_eq!(
            err.notification(Operation::Remove),
            Some("Error removing product")
        );
    }

    #[test]
    fn test_out_of_stock_message_is_shared() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        for op in [Operation::Add, Operation::UpdateAmount] {
            assert_eq!(err.notification(op), Some(OUT_OF_STOCK_MESSAGE));
        }
    }

    #[test]
    fn test_invalid_amount_is_silent() {
        let err = CartError::InvalidAmountRequested {
            product_id: ProductId::new(1),
            amount: 0,
        };
        assert!(err.is_silent());
        assert_eq!(err.notification(Operation::UpdateAmount), None);
        assert_eq!(err.product_id(), ProductId::new(1));
    }

    #[test]
    fn test_remote_errors() {
        let err = CartError::ProductMetadataFailed {
            product_id: ProductId::new(2),
            reason: "404".into(),
        };
        assert!(err.is_remote());
        assert!(!CartError::ProductNotInCart(ProductId::new(2)).is_remote());
    }
}
