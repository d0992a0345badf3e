//! Built-in catalog for `--offline`.

use trolley_core::{ProductDetails, ProductId};
use trolley_inventory::InMemoryInventory;

/// `(id, title, price, stock)`
const DEMO_CATALOG: &[(u64, &str, f64, u32)] = &[
    (1, "Trail Runner 2", 179.9, 3),
    (2, "Court Classic Low", 139.9, 5),
    (3, "Road Racer Knit", 219.9, 2),
    (4, "Canvas Slip-On", 89.9, 1),
    (5, "Hiking Mid GTX", 259.9, 5),
    (6, "Studio Trainer", 119.9, 0),
];

/// Returns an inventory seeded with the demo catalog.
pub fn demo_inventory() -> InMemoryInventory {
    DEMO_CATALOG
        .iter()
        .fold(InMemoryInventory::new(), |inventory, &(id, title, price, stock)| {
            let product = ProductDetails::new(ProductId::new(id))
                .with_field("title", title)
                .with_field("price", price)
                .with_field("image", format!("https://cdn.trolley.dev/products/{id}.jpg"));
            inventory.with_product(product, stock)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trolley_inventory::InventoryClient;

    #[tokio::test]
    async fn test_demo_catalog() {
        let inventory = demo_inventory();
        assert_eq!(inventory.catalog().len(), DEMO_CATALOG.len());

        let stock = inventory.stock(ProductId::new(6)).await.unwrap();
        assert_eq!(stock.map(|s| s.amount), Some(0));

        let product = inventory.product(ProductId::new(1)).await.unwrap();
        assert_eq!(product.title(), Some("Trail Runner 2"));
    }
}
