//! # Cart Session
//!
//! The handle consumers hold. One session = one hydration + one engine.
//!
//! ## Opening a Session
//! ```text
//! CartSession::builder(inventory)
//!     .store(kv)            ← default: MemoryStore (nothing survives)
//!     .cart_key(key)        ← default: "@trolley:cart"
//!     .sink(sink)           ← default: TracingSink
//!     .open().await
//!         │
//!         ├── snapshot present + valid        → that cart
//!         ├── snapshot absent                 → empty cart
//!         ├── snapshot malformed / invalid    → empty cart  (WARN)
//!         └── store unreachable               → empty cart  (WARN)
//! ```
//!
//! Opening never fails.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use trolley_core::{Cart, CartResult, ProductId, DEFAULT_CART_KEY};
use trolley_inventory::InventoryClient;
use trolley_store::{CartSnapshots, KeyValueStore, MemoryStore};
use uuid::Uuid;

use crate::engine::{CartEngine, UpdateProductAmount};
use crate::notify::{NotificationSink, TracingSink};

/// Builder for [`CartSession`].
pub struct CartSessionBuilder {
    inventory: Arc<dyn InventoryClient>,
    store: Option<Arc<dyn KeyValueStore>>,
    cart_key: String,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl CartSessionBuilder {
    /// Sets where the cart snapshot lives.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the key the snapshot is stored under.
    pub fn cart_key(mut self, key: impl Into<String>) -> Self {
        self.cart_key = key.into();
        self
    }

    /// Sets where failure messages go.
    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Hydrates the cart and starts the session.
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn open(self) -> CartSession {
        let id = Uuid::new_v4();
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink) as Arc<dyn NotificationSink>);
        let snapshots = CartSnapshots::with_key(store, self.cart_key);

        let cart = hydrate(&snapshots).await;
        info!(
            session = %id,
            key = %snapshots.key(),
            items = cart.len(),
            "Cart session opened"
        );

        CartSession {
            id,
            engine: CartEngine::new(id, cart, self.inventory, snapshots, sink),
        }
    }
}

async fn hydrate(snapshots: &CartSnapshots) -> Cart {
    match snapshots.load().await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) if e.is_corrupt_snapshot() => {
            warn!(key = %snapshots.key(), error = %e, "Discarding unreadable cart snapshot");
            Cart::new()
        }
        Err(e) => {
            warn!(key = %snapshots.key(), error = %e, "Cart store unavailable, starting empty");
            Cart::new()
        }
    }
}

/// A shopper's cart for the lifetime of one session.
///
/// ## Example
/// ```rust,ignore
/// let session = CartSession::builder(inventory).store(kv).open().await;
///
/// session.add_product(ProductId::new(1)).await.ok();
/// println!("{} units", session.cart().total_amount());
///
/// session.flush().await;
/// ```
#[derive(Debug)]
pub struct CartSession {
    id: Uuid,
    engine: CartEngine,
}

impl CartSession {
    pub fn builder(inventory: Arc<dyn InventoryClient>) -> CartSessionBuilder {
        CartSessionBuilder {
            inventory,
            store: None,
            cart_key: DEFAULT_CART_KEY.to_string(),
            sink: None,
        }
    }

    /// Unique id of this session, attached to every log span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest committed cart.
    pub fn cart(&self) -> Arc<Cart> {
        self.engine.cart()
    }

    /// Change notifications for the cart.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.engine.subscribe()
    }

    pub async fn add_product(&self, product_id: ProductId) -> CartResult<()> {
        self.engine.add_product(product_id).await
    }

    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        self.engine.remove_product(product_id).await
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartResult<()> {
        self.engine.update_product_amount(request).await
    }

    /// Waits for pending snapshot writes.
    pub async fn flush(&self) {
        self.engine.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;
    use trolley_core::{LineItem, ProductDetails, OUT_OF_STOCK_MESSAGE};
    use trolley_inventory::InMemoryInventory;
    use trolley_store::{Database, DbConfig};

    fn id(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    fn shoe(raw: u64) -> ProductDetails {
        ProductDetails::new(id(raw)).with_field("title", format!("Shoe {raw}"))
    }

    fn inventory() -> Arc<InMemoryInventory> {
        Arc::new(
            InMemoryInventory::new()
                .with_product(shoe(1), 5)
                .with_product(shoe(2), 5)
                .with_product(shoe(3), 5),
        )
    }

    #[tokio::test]
    async fn test_opens_empty_without_snapshot() {
        let session = CartSession::builder(inventory()).open().await;
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_hydrates_stored_cart() {
        let store = Arc::new(MemoryStore::with_entry(
            DEFAULT_CART_KEY,
            r#"[{"id":3,"amount":2,"title":"Shoe 3"}]"#,
        ));

        let session = CartSession::builder(inventory()).store(store).open().await;

        let cart = session.cart();
        assert_eq!(cart.get(id(3)).map(|i| i.amount), Some(2));
        assert_eq!(cart.get(id(3)).and_then(|i| i.title()), Some("Shoe 3"));
    }

    #[tokio::test]
    async fn test_malformed_snapshot_hydrates_empty() {
        for blob in ["{not json", r#"{"id":1}"#, r#"[{"id":1,"amount":0}]"#] {
            let store = Arc::new(MemoryStore::with_entry(DEFAULT_CART_KEY, blob));
            let session = CartSession::builder(inventory()).store(store).open().await;
            assert!(session.cart().is_empty(), "blob {blob} should hydrate empty");
        }
    }

    #[tokio::test]
    async fn test_custom_key() {
        let store = Arc::new(MemoryStore::with_entry(
            "other",
            r#"[{"id":1,"amount":1}]"#,
        ));

        let default_key = CartSession::builder(inventory())
            .store(store.clone())
            .open()
            .await;
        let other_key = CartSession::builder(inventory())
            .store(store)
            .cart_key("other")
            .open()
            .await;

        assert!(default_key.cart().is_empty());
        assert_eq!(other_key.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(db.kv());

        let first = CartSession::builder(inventory())
            .store(store.clone())
            .open()
            .await;
        first.add_product(id(1)).await.unwrap();
        first.add_product(id(2)).await.unwrap();
        first.add_product(id(1)).await.unwrap();
        first
            .update_product_amount(UpdateProductAmount::new(id(2), 4))
            .await
            .unwrap();
        first.flush().await;
        let expected = first.cart();
        drop(first);

        let second = CartSession::builder(inventory()).store(store).open().await;

        assert_eq!(second.cart(), expected);
        assert_eq!(
            second.cart().items(),
            &[
                LineItem::from_product(shoe(1)).with_amount(2),
                LineItem::from_product(shoe(2)).with_amount(4),
            ]
        );
    }

    #[tokio::test]
    async fn test_sink_receives_failures() {
        let sink = Arc::new(RecordingSink::new());
        let inventory = inventory();
        inventory.set_stock(id(1), 1);

        let session = CartSession::builder(inventory)
            .sink(sink.clone())
            .open()
            .await;

        session.add_product(id(1)).await.unwrap();
        assert!(session.add_product(id(1)).await.is_err());
        assert!(session.remove_product(id(9)).await.is_err());

        assert_eq!(
            sink.messages(),
            vec![
                OUT_OF_STOCK_MESSAGE.to_string(),
                "Error removing product".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_ids() {
        let a = CartSession::builder(inventory()).open().await;
        let b = CartSession::builder(inventory()).open().await;
        assert_ne!(a.id(), b.id());
    }
}
