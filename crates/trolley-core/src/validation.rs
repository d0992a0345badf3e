//! # Validation Module
//!
//! Input validation for Trolley.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Requested amounts                                            │
//! │  └── amount < 1 is dropped silently before any network call           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stock decisions (reconcile.rs)                               │
//! │  └── every commit respects the stock ceiling                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hydrated snapshots (THIS MODULE)                             │
//! │  └── anything read back from storage is re-checked                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::{CartError, CartResult, SnapshotError};
use crate::types::{Cart, ProductId};

/// Checks a requested absolute amount.
///
/// ## Rules
/// - `amount < 1` → [`CartError::InvalidAmountRequested`]
/// - amounts above `u32::MAX` saturate; no stock record can cover them
///
/// ## Example
/// ```rust
/// use trolley_core::validation::validate_requested_amount;
/// use trolley_core::ProductId;
///
/// let id = ProductId::new(1);
/// assert_eq!(validate_requested_amount(id, 3), Ok(3));
/// assert!(validate_requested_amount(id, 0).is_err());
/// ```
pub fn validate_requested_amount(product_id: ProductId, amount: i64) -> CartResult<u32> {
    if amount < 1 {
        return Err(CartError::InvalidAmountRequested { product_id, amount });
    }
    Ok(u32::try_from(amount).unwrap_or(u32::MAX))
}

/// Checks the cart invariants on a cart that did not come from the engine.
///
/// ## Rules
/// - every `amount >= 1`
/// - every product id appears once
pub fn validate_cart(cart: &Cart) -> Result<(), SnapshotError> {
    let mut seen = HashSet::with_capacity(cart.len());

    for item in cart {
        if item.amount == 0 {
            return Err(SnapshotError::ZeroAmount(item.id));
        }
        if !seen.insert(item.id) {
            return Err(SnapshotError::DuplicateProduct(item.id));
        }
    }

    Ok(())
}

/// Parses and validates a stored snapshot in one step.
pub fn parse_snapshot(snapshot: &str) -> Result<Cart, SnapshotError> {
    let cart = Cart::from_snapshot(snapshot)?;
    validate_cart(&cart)?;
    Ok(cart)
}
