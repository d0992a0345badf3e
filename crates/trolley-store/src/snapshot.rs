//! # Cart Snapshots
//!
//! Binds a [`KeyValueStore`] to the cart's fixed key and converts between the
//! stored blob and a [`Cart`].
//!
//! ## Load Outcomes
//! ```text
//! key absent                     → Ok(None)
//! valid JSON array, invariants ok → Ok(Some(cart))
//! bad JSON / duplicate / zero     → Err(StoreError::Snapshot(..))
//! store unreachable              → Err(other StoreError)
//! ```
//! Deciding what an error means for the session (start empty) is the
//! caller's job.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use trolley_core::validation::parse_snapshot;
use trolley_core::{Cart, DEFAULT_CART_KEY};

use crate::error::StoreResult;
use crate::store::KeyValueStore;

/// Cart snapshot access under a fixed key.
#[derive(Clone)]
pub struct CartSnapshots {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartSnapshots {
    /// Uses [`DEFAULT_CART_KEY`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        CartSnapshots {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and validates the stored cart.
    pub async fn load(&self) -> StoreResult<Option<Cart>> {
        let Some(blob) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "No stored cart snapshot");
            return Ok(None);
        };

        let cart = parse_snapshot(&blob)?;
        debug!(key = %self.key, items = cart.len(), "Loaded cart snapshot");
        Ok(Some(cart))
    }

    /// Replaces the stored cart.
    pub async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let blob = cart.to_snapshot()?;
        self.store.set(&self.key, &blob).await
    }

    /// Deletes the stored cart.
    pub async fn clear(&self) -> StoreResult<bool> {
        self.store.remove(&self.key).await
    }
}

impl fmt::Debug for CartSnapshots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSnapshots")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
