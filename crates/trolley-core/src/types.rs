//! # Domain Types
//!
//! Core domain types used throughout Trolley.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductDetails  │   │    LineItem     │   │  StockRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  product_id     │       │
//! │  │  ...metadata    │   │  amount (>= 1)  │   │  amount (>= 0)  │       │
//! │  └─────────────────┘   │  ...metadata    │   └─────────────────┘       │
//! │                        └────────┬────────┘                              │
//! │                                 │ ordered, unique by id                 │
//! │                        ┌────────▼────────┐                              │
//! │                        │      Cart       │                              │
//! │                        │  Vec<LineItem>  │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Format
//! A cart serializes as a bare JSON array. Catalog metadata is flattened next
//! to `id` and `amount` and passes through untouched:
//! ```json
//! [{ "id": 1, "amount": 2, "title": "Runner", "price": 139.9 }]
//! ```

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SnapshotError;

/// Open set of catalog fields carried by a product (title, price, image...).
pub type Metadata = Map<String, Value>;

// =============================================================================
// Product Id
// =============================================================================

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wraps a raw catalog id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ProductId(raw)
    }

    /// Returns the raw catalog id.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(raw: u64) -> Self {
        ProductId(raw)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ProductId)
    }
}

// =============================================================================
// Product Details
// =============================================================================

/// A product as described by the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Catalog id.
    pub id: ProductId,

    /// Every other field returned by the catalog.
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl ProductDetails {
    /// Creates details with no metadata.
    pub fn new(id: ProductId) -> Self {
        ProductDetails {
            id,
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata field (builder style).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the `title` field when the catalog provides one.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One distinct product in the cart with its selected quantity.
///
/// ## Invariants
/// - `amount >= 1`
/// - `id` is unique within a [`Cart`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog id.
    pub id: ProductId,

    /// Selected quantity.
    pub amount: u32,

    /// Catalog metadata captured when the product was first added.
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl LineItem {
    /// Creates a line item with `amount = 1` from catalog details.
    ///
    /// A catalog `amount` field would collide with the quantity on the wire,
    /// so it is dropped.
    pub fn from_product(product: ProductDetails) -> Self {
        let mut metadata = product.metadata;
        metadata.remove("amount");

        LineItem {
            id: product.id,
            amount: 1,
            metadata,
        }
    }

    /// Returns a copy with a different amount; every other field is kept.
    pub fn with_amount(&self, amount: u32) -> Self {
        LineItem {
            amount,
            ..self.clone()
        }
    }

    /// Returns the `title` field when the catalog provided one.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

// =============================================================================
// Stock Record
// =============================================================================

/// Units available for a product at query time.
///
/// Read-only from the cart's point of view and never cached: every mutation
/// queries a fresh record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: ProductId,
    pub amount: u32,
}

impl StockRecord {
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        StockRecord { product_id, amount }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered sequence of line items.
///
/// Insertion order is preserved: new products are appended and updates
/// replace an item in place. Transition methods return a new cart and leave
/// `self` untouched, so a rejected operation never has anything to undo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from items without checking invariants.
    ///
    /// Use [`crate::validation::validate_cart`] on anything that came from
    /// outside the engine.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// Parses a stored snapshot.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(snapshot).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    /// Serializes the cart to its snapshot form.
    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total number of units across all line items.
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    /// Finds the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == product_id)
    }

    /// Finds the position of a product's line item.
    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Returns a copy with the item at `index` replaced.
    ///
    /// ## Panics
    /// If `index` is out of bounds. Callers obtain it from [`Cart::position`].
    pub fn replaced(&self, index: usize, item: LineItem) -> Cart {
        let mut items = self.items.clone();
        items[index] = item;
        Cart { items }
    }

    /// Returns a copy with `item` appended at the end.
    pub fn appended(&self, item: LineItem) -> Cart {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend_from_slice(&self.items);
        items.push(item);
        Cart { items }
    }

    /// Returns a copy without the line item for `product_id`.
    pub fn without(&self, product_id: ProductId) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|i| i.id != product_id)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runner() -> ProductDetails {
        ProductDetails::new(ProductId::new(1))
            .with_field("title", "Runner")
            .with_field("price", 139.9)
    }

    #[test]
    fn test_product_id_parsing() {
        assert_eq!(" 42 ".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert!("abc".parse::<ProductId>().is_err());
        assert!("-1".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_line_item_from_product() {
        let item = LineItem::from_product(runner());

        assert_eq!(item.id, ProductId::new(1));
        assert_eq!(item.amount, 1);
        assert_eq!(item.title(), Some("Runner"));
    }

    #[test]
    fn test_catalog_amount_field_is_dropped() {
        let product = runner().with_field("amount", 99);
        let item = LineItem::from_product(product);

        assert_eq!(item.amount, 1);
        assert!(!item.metadata.contains_key("amount"));
    }

    #[test]
    fn test_snapshot_shape() {
        let cart = Cart::new().appended(LineItem::from_product(runner()));
        let value: Value = serde_json::from_str(&cart.to_snapshot().unwrap()).unwrap();

        assert_eq!(
            value,
            json!([{ "id": 1, "amount": 1, "title": "Runner", "price": 139.9 }])
        );
    }

    #[test]
    fn test_snapshot_keeps_unknown_fields() {
        let raw = r#"[{"id":7,"amount":3,"image":"x.png","sizes":[40,41]}]"#;
        let cart = Cart::from_snapshot(raw).unwrap();

        let item = cart.get(ProductId::new(7)).unwrap();
        assert_eq!(item.amount, 3);
        assert_eq!(item.metadata["sizes"], json!([40, 41]));

        let reparsed = Cart::from_snapshot(&cart.to_snapshot().unwrap()).unwrap();
        assert_eq!(reparsed, cart);
    }

    #[test]
    fn test_malformed_snapshot() {
        assert!(matches!(
            Cart::from_snapshot("{not json"),
            Err(SnapshotError::Malformed(_))
        ));
        assert!(matches!(
            Cart::from_snapshot(r#"[{"id":1}]"#),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn test_transitions_do_not_touch_original() {
        let cart = Cart::new().appended(LineItem::from_product(runner()));
        let bumped = cart.replaced(0, cart.items()[0].with_amount(4));
        let emptied = cart.without(ProductId::new(1));

        assert_eq!(cart.items()[0].amount, 1);
        assert_eq!(bumped.items()[0].amount, 4);
        assert_eq!(bumped.items()[0].title(), Some("Runner"));
        assert!(emptied.is_empty());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_amount() {
        let cart = Cart::from_items(vec![
            LineItem::from_product(ProductDetails::new(ProductId::new(1))).with_amount(2),
            LineItem::from_product(ProductDetails::new(ProductId::new(2))).with_amount(3),
        ]);

        assert_eq!(cart.total_amount(), 5);
        assert!(cart.contains(ProductId::new(2)));
        assert_eq!(cart.position(ProductId::new(2)), Some(1));
    }
}
