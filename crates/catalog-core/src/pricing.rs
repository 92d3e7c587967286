//! # Pricing Module
//!
//! Pure query and basket math over an in-memory list of products.
//!
//! Every backend can answer the aggregation queries by loading products and
//! calling these functions; the SQLite store answers the same questions in
//! SQL and must agree with the results here.
//!
//! ## Basket Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price_basket   (purchase_products_from_store)                          │
//! │  ├── lookup (name, store_id)                                            │
//! │  ├── missing?  → skip, contributes 0                                   │
//! │  └── found     → total += price × qty        stock is NOT touched      │
//! │                                                                         │
//! │  checkout       (total_price_for_products_in_store)                     │
//! │  ├── lookup (name, store_id)                                            │
//! │  ├── missing?  → ProductNotInStore           nothing deducted          │
//! │  ├── qty > stock → InsufficientStock         nothing deducted          │
//! │  └── all lines ok → total, every line deducted                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::basket::Basket;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

/// The single cheapest record named `item_name`, across all stores.
///
/// Ties keep the earliest record in `products` order.
pub fn cheapest_for_item(products: &[Product], item_name: &str) -> Option<Product> {
    products
        .iter()
        .filter(|p| p.product_name == item_name)
        .fold(None::<&Product>, |best, p| match best {
            Some(b) if b.price <= p.price => Some(b),
            _ => Some(p),
        })
        .cloned()
}

/// Every record of `store_id` whose unit price is at most `amount`.
pub fn affordable_for_amount(products: &[Product], store_id: i64, amount: Money) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.store_id == store_id && p.price <= amount)
        .cloned()
        .collect()
}

/// Adds one line to a running basket total, failing on overflow.
pub fn add_line(total: Money, line: Money, product: &str) -> CoreResult<Money> {
    total
        .checked_add(line)
        .ok_or_else(|| CoreError::TotalOverflow {
            product: product.to_string(),
        })
}

/// Prices a basket against one store without touching stock.
///
/// Lines naming a product the store does not carry are skipped.
pub fn price_basket(products: &[Product], store_id: i64, basket: &Basket) -> CoreResult<Money> {
    let mut total = Money::zero();

    for (name, qty) in basket.iter() {
        if let Some(product) = products.iter().find(|p| p.has_key(name, store_id)) {
            total = add_line(total, product.line_total(qty)?, name)?;
        }
    }

    Ok(total)
}

/// Prices a basket and deducts stock, all or nothing.
///
/// Works on a scratch copy; `products` is only replaced once every line has
/// succeeded, so on error the caller's records are exactly as they were.
pub fn checkout(products: &mut Vec<Product>, store_id: i64, basket: &Basket) -> CoreResult<Money> {
    let mut scratch = products.clone();
    let mut total = Money::zero();

    for (name, qty) in basket.iter() {
        let product = scratch
            .iter_mut()
            .find(|p| p.has_key(name, store_id))
            .ok_or_else(|| CoreError::ProductNotInStore {
                product: name.to_string(),
                store_id,
            })?;

        total = add_line(total, product.take_stock(qty)?, name)?;
    }

    *products = scratch;
    Ok(total)
}

// =============================================================================
// Unit Tests
// =============================================================================
