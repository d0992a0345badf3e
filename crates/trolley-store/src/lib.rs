//! # trolley-store: Persistence Layer for Trolley
//!
//! This crate keeps the cart alive between sessions. The engine only sees an
//! opaque key-value blob store; SQLite is one implementation of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Trolley Persistence                              │
//! │                                                                         │
//! │  CartEngine commit                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   trolley-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CartSnapshots │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │(snapshot.rs)  │───►│  (store.rs)   │    │  (embedded)  │  │   │
//! │  │   │ fixed key     │    │ KvRepository  │    │ 001_kv.sql   │  │   │
//! │  │   │ JSON array    │    │ MemoryStore   │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  └────────────────────────────────┼───────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                      SQLite (kv_store table)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - SQLite repositories
//! - [`store`] - The `KeyValueStore` seam and the in-memory store
//! - [`snapshot`] - Cart snapshots under a fixed key
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trolley_store::{CartSnapshots, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/trolley.db")).await?;
//! let snapshots = CartSnapshots::new(Arc::new(db.kv()));
//!
//! let cart = snapshots.load().await?.unwrap_or_default();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KvRepository;
pub use snapshot::CartSnapshots;
pub use store::{KeyValueStore, MemoryStore};
