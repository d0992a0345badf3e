//! # Shell Error Type
//!
//! Everything that can stop the shell. Cart rejections are not here: they
//! are reported through the console sink and the loop carries on.
//!
//! ```text
//! ConfigError ────┐
//! StoreError  ────┼──► ShellError ──► main() ──► exit code 1
//! InventoryError ─┤
//! io::Error ──────┘
//! ```

use thiserror::Error;
use trolley_inventory::InventoryError;
use trolley_store::StoreError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
