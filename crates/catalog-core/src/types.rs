//! # Domain Types
//!
//! The catalog has a single entity: a stock record for one product in one
//! store.
//!
//! ## Composite Key
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product                                         │
//! │  ─────────────────────────────────────────────                          │
//! │  ProductName  ─┐                                                        │
//! │  StoreId      ─┴─► composite key (name alone is NOT unique)             │
//! │  Quantity        remaining stock, never negative                        │
//! │  Price           unit price, exact Money                                │
//! │                                                                         │
//! │  ("Apple", 1)  and  ("Apple", 2)  are two different records            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize in PascalCase so JSON, the flat-file header and
//! the SQL columns all read `ProductName, StoreId, Quantity, Price`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{
    validate_price, validate_product_name, validate_stock_quantity, validate_store_id,
    ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A product held by one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
pub struct Product {
    /// Display name, half of the composite key.
    pub product_name: String,

    /// Owning store, the other half of the composite key.
    pub store_id: i64,

    /// Units in stock.
    pub quantity: i64,

    /// Unit price.
    pub price: Money,
}

impl Product {
    /// Creates a product. Nothing is validated until [`Product::validate`].
    pub fn new(product_name: impl Into<String>, store_id: i64, quantity: i64, price: Money) -> Self {
        Product {
            product_name: product_name.into(),
            store_id,
            quantity,
            price,
        }
    }

    /// Checks every field invariant. Stores call this before any write.
    ///
    /// ## Rules
    /// - `store_id > 0`
    /// - `product_name` non-empty
    /// - `quantity >= 0`
    /// - `price >= 0`
    pub fn validate(&self) -> ValidationResult<()> {
        validate_store_id(self.store_id)?;
        validate_product_name(&self.product_name)?;
        validate_stock_quantity(self.quantity)?;
        validate_price(self.price)?;
        Ok(())
    }

    /// True when this record has the composite key `(name, store_id)`.
    #[inline]
    pub fn has_key(&self, name: &str, store_id: i64) -> bool {
        self.store_id == store_id && self.product_name == name
    }

    /// True when both records share a composite key.
    #[inline]
    pub fn same_key(&self, other: &Product) -> bool {
        self.has_key(&other.product_name, other.store_id)
    }

    /// Price of `quantity` units, failing on overflow.
    pub fn line_total(&self, quantity: i64) -> CoreResult<Money> {
        self.price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| CoreError::TotalOverflow {
                product: self.product_name.clone(),
            })
    }

    /// Removes `quantity` units from stock and returns their price.
    ///
    /// Taking exactly the remaining stock is allowed and leaves zero.
    /// On error the record is unchanged.
    pub fn take_stock(&mut self, quantity: i64) -> CoreResult<Money> {
        if quantity > self.quantity {
            return Err(CoreError::InsufficientStock {
                product: self.product_name.clone(),
                store_id: self.store_id,
                available: self.quantity,
                requested: quantity,
            });
        }

        let total = self.line_total(quantity)?;
        self.quantity -= quantity;
        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
