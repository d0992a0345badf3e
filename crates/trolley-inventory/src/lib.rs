//! # trolley-inventory: Stock and Catalog Queries
//!
//! The cart's only window onto the outside world.
//!
//! ## Module Organization
//! ```text
//! trolley_inventory
//! ├── client   - InventoryClient trait (the seam the session depends on)
//! ├── http     - HttpInventoryClient (reqwest)
//! ├── memory   - InMemoryInventory (tests, offline shell)
//! ├── config   - InventoryConfig
//! └── error    - InventoryError
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use trolley_inventory::{HttpInventoryClient, InventoryClient, InventoryConfig};
//!
//! let client = HttpInventoryClient::new(&InventoryConfig::new("http://localhost:3333"))?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use client::InventoryClient;
pub use config::InventoryConfig;
pub use error::{InventoryError, InventoryResult};
pub use http::HttpInventoryClient;
pub use memory::InMemoryInventory;
