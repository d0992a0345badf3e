//! # trolley-core: Pure Cart Logic for Trolley
//!
//! This crate is the **heart** of Trolley. It owns the cart data model and
//! every stock decision as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Trolley Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation layer (any consumer)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         trolley-session (CartSession + CartEngine)              │   │
//! │  │   queries stock ──► asks core for a decision ──► commits        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ trolley-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ reconcile │  │   error   │  │ validation│  │   │
//! │  │   │   Cart    │  │  add /    │  │ CartError │  │ snapshots │  │   │
//! │  │   │ LineItem  │  │ remove /  │  │ Operation │  │  amounts  │  │   │
//! │  │   │ StockRec. │  │ set amount│  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductId, LineItem, Cart, StockRecord)
//! - [`reconcile`] - Stock decisions for add, remove and set-amount
//! - [`error`] - Cart error taxonomy and user-facing messages
//! - [`validation`] - Requested amounts and hydrated snapshots
//!
//! ## Example Usage
//!
//! ```rust
//! use trolley_core::reconcile::{self, AddDecision};
//! use trolley_core::{Cart, ProductDetails, ProductId, StockRecord};
//!
//! let cart = Cart::new();
//! let id = ProductId::new(1);
//! let stock = StockRecord::new(id, 5);
//!
//! let decision = reconcile::decide_add(&cart, id, Some(&stock)).unwrap();
//! assert_eq!(decision, AddDecision::Append);
//!
//! let cart = reconcile::append(&cart, ProductDetails::new(id));
//! assert_eq!(cart.get(id).map(|item| item.amount), Some(1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CartError, CartResult, Operation, SnapshotError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the cart snapshot is stored.
///
/// Every session of the same installation reads and writes this key, which is
/// what lets a cart survive a restart.
pub const DEFAULT_CART_KEY: &str = "@trolley:cart";

/// Message shown when the requested quantity exceeds available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity out of stock";
