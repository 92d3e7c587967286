//! # Basket Module
//!
//! A basket maps product names to requested quantities. It is the input of
//! both basket-pricing operations.
//!
//! ```text
//! Basket { "Apple": 3, "Pear": 1 }
//!      │
//!      ▼
//! purchase_products_from_store(1, &basket)        → 6.00 + 1.20 (stock untouched)
//! total_price_for_products_in_store(1, &basket)   → same total, stock deducted
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product name → requested quantity.
///
/// Lines iterate in name order, so every backend visits them in the same
/// sequence. Adding a name that is already present sums the quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basket(BTreeMap<String, i64>);

impl Basket {
    /// Creates an empty basket.
    pub fn new() -> Self {
        Basket(BTreeMap::new())
    }

    /// Adds `quantity` units of `name`, summing with any existing line.
    ///
    /// The sum saturates at the `i64` bounds. A saturated line still asks
    /// for more than any stock, so stores reject it like any other
    /// oversized request.
    pub fn add(&mut self, name: impl Into<String>, quantity: i64) {
        let line = self.0.entry(name.into()).or_insert(0);
        *line = line.saturating_add(quantity);
    }

    /// Builder form of [`Basket::add`].
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::Basket;
    ///
    /// let basket = Basket::new().with("Apple", 3).with("Apple", 2);
    /// assert_eq!(basket.quantity_of("Apple"), Some(5));
    /// ```
    pub fn with(mut self, name: impl Into<String>, quantity: i64) -> Self {
        self.add(name, quantity);
        self
    }

    /// Requested quantity for `name`, if the basket has that line.
    pub fn quantity_of(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, quantity)` lines in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.0.iter().map(|(name, qty)| (name.as_str(), *qty))
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Basket {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut basket = Basket::new();
        for (name, qty) in iter {
            basket.add(name, qty);
        }
        basket
    }
}
