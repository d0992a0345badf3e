//! # Inventory Client Seam
//!
//! The cart engine asks two questions of the outside world:
//!
//! ```text
//! stock(id)   → how many units may the cart hold?   (every add / update)
//! product(id) → what does this product look like?   (first add only)
//! ```
//!
//! Both are async and may fail. Neither is cached: every operation sees the
//! service's current answer.

use std::sync::Arc;

use async_trait::async_trait;
use trolley_core::{ProductDetails, ProductId, StockRecord};

use crate::error::InventoryResult;

/// Remote stock and catalog queries.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Queries available stock.
    ///
    /// `Ok(None)` means the service has no stock record for the product,
    /// which the cart treats the same as zero stock.
    async fn stock(&self, product_id: ProductId) -> InventoryResult<Option<StockRecord>>;

    /// Fetches catalog metadata for a product.
    async fn product(&self, product_id: ProductId) -> InventoryResult<ProductDetails>;
}

#[async_trait]
impl<T: InventoryClient + ?Sized> InventoryClient for Arc<T> {
    async fn stock(&self, product_id: ProductId) -> InventoryResult<Option<StockRecord>> {
        (**self).stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> InventoryResult<ProductDetails> {
        (**self).product(product_id).await
    }
}
