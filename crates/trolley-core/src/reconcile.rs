//! # Reconciliation Decisions
//!
//! Pure decision functions behind the three cart operations. The engine
//! performs the I/O (stock query, catalog query, commit); everything that
//! decides *whether* and *how* the cart changes lives here.
//!
//! ## Add Decision Table
//! ```text
//! ┌──────────────────────────────┬──────────────────────┬─────────────────┐
//! │ stock                        │ line item in cart?   │ decision        │
//! ├──────────────────────────────┼──────────────────────┼─────────────────┤
//! │ missing or 0                 │ any                  │ OutOfStock      │
//! │ n                            │ yes, amount >= n     │ OutOfStock      │
//! │ n                            │ yes, amount <  n     │ Increment       │
//! │ n > 0                        │ no                   │ Append (fetch   │
//! │                              │                      │ catalog first)  │
//! └──────────────────────────────┴──────────────────────┴─────────────────┘
//! ```
//!
//! ## Set-Amount Order of Checks
//! 1. product must already be in the cart (`ProductNotInCart`)
//! 2. stock must exist and cover the amount (`OutOfStock`)

use crate::error::{CartError, CartResult};
use crate::types::{Cart, LineItem, ProductDetails, ProductId, StockRecord};

/// What an accepted add does to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddDecision {
    /// Bump the existing line item at `index` by one.
    Increment { index: usize },

    /// Fetch catalog details and append a new line item.
    Append,
}

/// Runs the add decision table against the current cart and a fresh stock
/// record.
pub fn decide_add(
    cart: &Cart,
    product_id: ProductId,
    stock: Option<&StockRecord>,
) -> CartResult<AddDecision> {
    let available = stock.map_or(0, |s| s.amount);

    match cart.position(product_id) {
        Some(index) => {
            let current = cart.items()[index].amount;
            if available == 0 || current >= available {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: current.saturating_add(1),
                    available,
                });
            }
            Ok(AddDecision::Increment { index })
        }
        None => {
            if available == 0 {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: 1,
                    available,
                });
            }
            Ok(AddDecision::Append)
        }
    }
}

/// Applies [`AddDecision::Increment`]: the item keeps its position.
pub fn increment(cart: &Cart, index: usize) -> Cart {
    let item = &cart.items()[index];
    cart.replaced(index, item.with_amount(item.amount.saturating_add(1)))
}

/// Applies [`AddDecision::Append`] once catalog details are in hand.
pub fn append(cart: &Cart, product: ProductDetails) -> Cart {
    cart.appended(LineItem::from_product(product))
}

/// Removes a product's line item, preserving the order of the rest.
pub fn remove(cart: &Cart, product_id: ProductId) -> CartResult<Cart> {
    if !cart.contains(product_id) {
        return Err(CartError::ProductNotInCart(product_id));
    }
    Ok(cart.without(product_id))
}

/// Sets a product's amount to an absolute value.
///
/// `amount` must already have passed
/// [`crate::validation::validate_requested_amount`].
pub fn set_amount(
    cart: &Cart,
    product_id: ProductId,
    amount: u32,
    stock: Option<&StockRecord>,
) -> CartResult<Cart> {
    let index = cart
        .position(product_id)
        .ok_or(CartError::ProductNotInCart(product_id))?;

    match stock {
        Some(stock) if amount <= stock.amount => {
            Ok(cart.replaced(index, cart.items()[index].with_amount(amount)))
        }
        _ => Err(CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.map_or(0, |s| s.amount),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_cart;
    use proptest::prelude::*;

    fn id(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    fn stock(raw: u64, amount: u32) -> StockRecord {
        StockRecord::new(id(raw), amount)
    }

    fn cart_of(items: &[(u64, u32)]) -> Cart {
        Cart::from_items(
            items
                .iter()
                .map(|&(raw, amount)| {
                    LineItem::from_product(ProductDetails::new(id(raw))).with_amount(amount)
                })
                .collect(),
        )
    }

    #[test]
    fn test_add_new_product_appends() {
        let cart = cart_of(&[(2, 1)]);
        let decision = decide_add(&cart, id(1), Some(&stock(1, 5))).unwrap();
        assert_eq!(decision, AddDecision::Append);

        let next = append(&cart, ProductDetails::new(id(1)).with_field("title", "Runner"));
        assert_eq!(next.len(), 2);
        assert_eq!(next.items()[1].id, id(1));
        assert_eq!(next.items()[1].amount, 1);
    }

    #[test]
    fn test_add_existing_increments_in_place() {
        let cart = cart_of(&[(1, 2), (2, 1), (3, 1)]);
        let decision = decide_add(&cart, id(2), Some(&stock(2, 5))).unwrap();
        assert_eq!(decision, AddDecision::Increment { index: 1 });

        let next = increment(&cart, 1);
        assert_eq!(next, cart_of(&[(1, 2), (2, 2), (3, 1)]));
    }

    #[test]
    fn test_add_rejected_when_stock_missing_or_zero() {
        let cart = Cart::new();
        assert!(matches!(
            decide_add(&cart, id(1), None),
            Err(CartError::OutOfStock { available: 0, requested: 1, .. })
        ));
        assert!(matches!(
            decide_add(&cart, id(1), Some(&stock(1, 0))),
            Err(CartError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_add_rejected_at_stock_ceiling() {
        let cart = cart_of(&[(1, 1)]);
        let err = decide_add(&cart, id(1), Some(&stock(1, 1))).unwrap_err();
        assert_eq!(
            err,
            CartError::OutOfStock {
                product_id: id(1),
                requested: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_remove() {
        let cart = cart_of(&[(1, 1), (2, 4), (3, 2)]);
        assert_eq!(remove(&cart, id(2)).unwrap(), cart_of(&[(1, 1), (3, 2)]));
        assert_eq!(
            remove(&cart, id(9)),
            Err(CartError::ProductNotInCart(id(9)))
        );
    }

    #[test]
    fn test_set_amount() {
        let cart = cart_of(&[(1, 1), (2, 3)]);
        let next = set_amount(&cart, id(2), 5, Some(&stock(2, 5))).unwrap();
        assert_eq!(next, cart_of(&[(1, 1), (2, 5)]));
    }

    #[test]
    fn test_set_amount_above_stock_rejected() {
        let cart = cart_of(&[(2, 3)]);
        let err = set_amount(&cart, id(2), 10, Some(&stock(2, 5))).unwrap_err();
        assert_eq!(
            err,
            CartError::OutOfStock {
                product_id: id(2),
                requested: 10,
                available: 5
            }
        );
        assert!(matches!(
            set_amount(&cart, id(2), 1, None),
            Err(CartError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_set_amount_checks_cart_before_stock() {
        let cart = cart_of(&[(1, 1)]);
        assert_eq!(
            set_amount(&cart, id(2), 1, None),
            Err(CartError::ProductNotInCart(id(2)))
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Remove(u64),
        Set(u64, u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..6).prop_map(Op::Add),
            (0u64..6).prop_map(Op::Remove),
            (0u64..6, 1u32..8).prop_map(|(p, a)| Op::Set(p, a)),
        ]
    }

    proptest! {
        #[test]
        fn prop_cart_stays_unique_and_under_stock(
            stocks in proptest::collection::vec(0u32..5, 6),
            ops in proptest::collection::vec(op(), 0..60),
        ) {
            let stock_of = |raw: u64| StockRecord::new(id(raw), stocks[raw as usize]);
            let mut cart = Cart::new();

            for op in ops {
                let next = match op {
                    Op::Add(p) => match decide_add(&cart, id(p), Some(&stock_of(p))) {
                        Ok(AddDecision::Increment { index }) => Some(increment(&cart, index)),
                        Ok(AddDecision::Append) => Some(append(&cart, ProductDetails::new(id(p)))),
                        Err(_) => None,
                    },
                    Op::Remove(p) => remove(&cart, id(p)).ok(),
                    Op::Set(p, a) => set_amount(&cart, id(p), a, Some(&stock_of(p))).ok(),
                };
                if let Some(next) = next {
                    cart = next;
                }

                prop_assert!(validate_cart(&cart).is_ok());
                for item in &cart {
                    prop_assert!(item.amount <= stocks[item.id.get() as usize]);
                }
            }
        }

        #[test]
        fn prop_rejected_add_leaves_length(
            amount in 1u32..10,
            available in 0u32..10,
        ) {
            let cart = cart_of(&[(1, amount)]);
            match decide_add(&cart, id(1), Some(&stock(1, available))) {
                Ok(AddDecision::Increment { index }) => {
                    let next = increment(&cart, index);
                    prop_assert_eq!(next.len(), 1);
                    prop_assert_eq!(next.items()[0].amount, amount + 1);
                }
                Ok(AddDecision::Append) => prop_assert!(false, "existing product appended"),
                Err(_) => prop_assert!(amount >= available),
            }
        }
    }
}
