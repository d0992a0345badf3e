//! # Cart Engine
//!
//! Owns the authoritative cart for one session and runs the three mutating
//! operations against live inventory.
//!
//! ## Operation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add / remove / update                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  acquire operation gate ◄── held until commit or rejection              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  query stock (and catalog on first add)        ── may suspend ──        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reconcile::* decides on the current cart                               │
//! │       │                                                                 │
//! │       ├── Err(cause) ──► sink.report_error(message) ──► Err(cause)      │
//! │       │                  (silent for InvalidAmountRequested)            │
//! │       ▼                                                                 │
//! │  commit: watch.send_replace(new)  then  writer.enqueue(new)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The gate is a `tokio::sync::Mutex` because it is held across the inventory
//! awaits. Readers never take it: they read the latest `Arc<Cart>` from the
//! watch channel, which is replaced before an operation returns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};
use trolley_core::reconcile::{self, AddDecision};
use trolley_core::validation::validate_requested_amount;
use trolley_core::{Cart, CartError, CartResult, Operation, ProductId};
use trolley_inventory::{InventoryClient, InventoryError};
use trolley_store::CartSnapshots;
use uuid::Uuid;

use crate::notify::NotificationSink;
use crate::writer::SnapshotWriter;

/// Payload of the set-amount operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,

    /// Requested absolute quantity. Values below 1 are ignored.
    pub amount: i64,
}

impl UpdateProductAmount {
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        UpdateProductAmount { product_id, amount }
    }
}

/// The per-session cart state machine.
pub struct CartEngine {
    session_id: Uuid,
    gate: Mutex<()>,
    state: watch::Sender<Arc<Cart>>,
    inventory: Arc<dyn InventoryClient>,
    sink: Arc<dyn NotificationSink>,
    writer: SnapshotWriter,
}

impl CartEngine {
    /// Creates an engine around an already-hydrated cart.
    ///
    /// Spawns the snapshot writer, so this must run inside a tokio runtime.
    pub fn new(
        session_id: Uuid,
        initial: Cart,
        inventory: Arc<dyn InventoryClient>,
        snapshots: CartSnapshots,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));

        CartEngine {
            session_id,
            gate: Mutex::new(()),
            state,
            inventory,
            sink,
            writer: SnapshotWriter::spawn(snapshots),
        }
    }

    /// Returns the most recently committed cart.
    pub fn cart(&self) -> Arc<Cart> {
        self.state.borrow().clone()
    }

    /// Subscribes to committed carts.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.state.subscribe()
    }

    /// Waits for every commit so far to reach the store.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds one unit of a product.
    #[instrument(skip_all, fields(session = %self.session_id, product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<()> {
        let result = self.try_add(product_id).await;
        self.conclude(Operation::Add, result)
    }

    /// Removes a product's line item.
    #[instrument(skip_all, fields(session = %self.session_id, product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        let result = self.try_remove(product_id).await;
        self.conclude(Operation::Remove, result)
    }

    /// Sets a product's amount.
    #[instrument(
        skip_all,
        fields(session = %self.session_id, product_id = %request.product_id, amount = request.amount)
    )]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartResult<()> {
        let result = self.try_update(request).await;
        self.conclude(Operation::UpdateAmount, result)
    }

    async fn try_add(&self, product_id: ProductId) -> CartResult<()> {
        let _gate = self.gate.lock().await;
        debug!("Adding product");

        let stock = self
            .inventory
            .stock(product_id)
            .await
            .map_err(|e| stock_failed(product_id, e))?;

        let cart = self.cart();
        let next = match reconcile::decide_add(&cart, product_id, stock.as_ref())? {
            AddDecision::Increment { index } => reconcile::increment(&cart, index),
            AddDecision::Append => {
                let product = self.inventory.product(product_id).await.map_err(|e| {
                    CartError::ProductMetadataFailed {
                        product_id,
                        reason: e.to_string(),
                    }
                })?;
                reconcile::append(&cart, product)
            }
        };

        self.commit(next);
        Ok(())
    }

    async fn try_remove(&self, product_id: ProductId) -> CartResult<()> {
        let _gate = self.gate.lock().await;
        debug!("Removing product");

        let next = reconcile::remove(&self.cart(), product_id)?;
        self.commit(next);
        Ok(())
    }

    async fn try_update(&self, request: UpdateProductAmount) -> CartResult<()> {
        let product_id = request.product_id;
        let amount = validate_requested_amount(product_id, request.amount)?;

        let _gate = self.gate.lock().await;
        debug!("Updating product amount");

        let stock = self
            .inventory
            .stock(product_id)
            .await
            .map_err(|e| stock_failed(product_id, e))?;

        let next = reconcile::set_amount(&self.cart(), product_id, amount, stock.as_ref())?;
        self.commit(next);
        Ok(())
    }

    // =========================================================================
    // Commit / Rejection
    // =========================================================================

    /// Memory first, then the store. Callers hold the gate.
    fn commit(&self, next: Cart) {
        let next = Arc::new(next);
        info!(
            items = next.len(),
            units = next.total_amount(),
            "Cart committed"
        );
        self.state.send_replace(next.clone());
        self.writer.enqueue(next);
    }

    fn conclude(&self, operation: Operation, result: CartResult<()>) -> CartResult<()> {
        if let Err(err) = &result {
            match err.notification(operation) {
                Some(message) => {
                    warn!(operation = %operation, error = %err, "Cart operation rejected");
                    self.sink.report_error(message);
                }
                None => debug!(operation = %operation, error = %err, "Cart operation ignored"),
            }
        }
        result
    }
}

fn stock_failed(product_id: ProductId, err: InventoryError) -> CartError {
    CartError::StockQueryFailed {
        product_id,
        reason: err.to_string(),
    }
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("session_id", &self.session_id)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
