//! # In-Memory Inventory
//!
//! A process-local [`InventoryClient`]. The shell's `--offline` mode seeds
//! one with a small catalog; the session tests use it to script stock
//! levels, inject failures and count queries.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use trolley_core::{ProductDetails, ProductId, StockRecord};

use crate::client::InventoryClient;
use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Default)]
struct State {
    stock: HashMap<ProductId, u32>,
    products: HashMap<ProductId, ProductDetails>,
    failing_stock: HashSet<ProductId>,
    failing_products: HashSet<ProductId>,
}

/// Scriptable inventory.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: Mutex<State>,
    latency: Option<Duration>,
    stock_calls: AtomicUsize,
    product_calls: AtomicUsize,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer, so concurrent callers actually overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Registers a product with its stock level (builder style).
    pub fn with_product(self, product: ProductDetails, stock: u32) -> Self {
        let product_id = product.id;
        self.add_product(product);
        self.set_stock(product_id, stock);
        self
    }

    /// Registers or replaces catalog details.
    pub fn add_product(&self, product: ProductDetails) {
        self.with_state(|state| {
            state.products.insert(product.id, product);
        });
    }

    /// Sets the stock level. The product need not be in the catalog.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.with_state(|state| {
            state.stock.insert(product_id, amount);
        });
    }

    /// Deletes the stock record, so queries answer "no record".
    pub fn remove_stock(&self, product_id: ProductId) {
        self.with_state(|state| {
            state.stock.remove(&product_id);
        });
    }

    /// Makes stock queries for `product_id` fail (or succeed again).
    pub fn fail_stock(&self, product_id: ProductId, fail: bool) {
        self.with_state(|state| toggle(&mut state.failing_stock, product_id, fail));
    }

    /// Makes catalog queries for `product_id` fail (or succeed again).
    pub fn fail_product(&self, product_id: ProductId, fail: bool) {
        self.with_state(|state| toggle(&mut state.failing_products, product_id, fail));
    }

    /// Number of stock queries answered so far.
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of catalog queries answered so far.
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Lists the catalog, sorted by id.
    pub fn catalog(&self) -> Vec<(ProductDetails, Option<u32>)> {
        let state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut entries: Vec<_> = state
            .products
            .values()
            .map(|p| (p.clone(), state.stock.get(&p.id).copied()))
            .collect();
        entries.sort_by_key(|(p, _)| p.id);
        entries
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut state)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn toggle(set: &mut HashSet<ProductId>, product_id: ProductId, on: bool) {
    if on {
        set.insert(product_id);
    } else {
        set.remove(&product_id);
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventory {
    async fn stock(&self, product_id: ProductId) -> InventoryResult<Option<StockRecord>> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        self.with_state(|state| {
            if state.failing_stock.contains(&product_id) {
                return Err(InventoryError::ConnectionFailed(format!(
                    "stock query for product {product_id} failed"
                )));
            }
            Ok(state
                .stock
                .get(&product_id)
                .map(|amount| StockRecord::new(product_id, *amount)))
        })
    }

    async fn product(&self, product_id: ProductId) -> InventoryResult<ProductDetails> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        self.with_state(|state| {
            if state.failing_products.contains(&product_id) {
                return Err(InventoryError::ConnectionFailed(format!(
                    "product query for product {product_id} failed"
                )));
            }
            state
                .products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| InventoryError::Status {
                    status: 404,
                    url: format!("memory://products/{product_id}"),
                })
        })
    }
}
