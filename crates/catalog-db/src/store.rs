//! # ProductStore Contract
//!
//! The operation set every backend implements, and the guarantees callers
//! may assume regardless of backend.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ProductStore                                    │
//! │                                                                         │
//! │  Primitives (every backend implements)                                 │
//! │  ├── get_by_name               ├── add                                 │
//! │  ├── get_by_name_and_store_id  ├── update   (no-op → false)            │
//! │  ├── get_all                   ├── delete   (no-op → false)            │
//! │  └── get_by_store_id                                                    │
//! │                                                                         │
//! │  Aggregations (default: primitives + catalog_core::pricing)            │
//! │  ├── cheapest_for_item                                                  │
//! │  ├── affordable_for_amount                                              │
//! │  ├── purchase_products_from_store      pricing only                    │
//! │  └── total_price_for_products_in_store deducts stock, all or nothing   │
//! │                                        (required: needs the medium's   │
//! │                                         own atomicity)                  │
//! │                                                                         │
//! │  SqliteProductStore overrides every aggregation with SQL.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Arguments are validated before any I/O; a validation failure leaves
//!   the medium untouched.
//! - Lookups that find nothing return `None` / an empty list, never an error.
//! - `update` / `delete` on a missing composite key change nothing and
//!   return `false`.

use async_trait::async_trait;
use catalog_core::validation::{
    validate_amount, validate_basket, validate_basket_quantities, validate_product_name,
    validate_store_id, ValidationResult,
};
use catalog_core::{pricing, Basket, Money, Product};

use crate::error::StoreResult;

/// A storage backend for products.
///
/// ## Usage
/// ```rust,ignore
/// let store: Arc<dyn ProductStore> = open_store(&config).await?;
///
/// store.add(&Product::new("Apple", 1, 10, "2.00".parse()?)).await?;
/// let total = store
///     .purchase_products_from_store(1, &Basket::new().with("Apple", 3))
///     .await?;
/// ```
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Short backend label for logs and the CLI banner.
    fn backend(&self) -> &'static str;

    /// First record named `name`, in storage order.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    /// The record with composite key `(name, store_id)`.
    async fn get_by_name_and_store_id(
        &self,
        name: &str,
        store_id: i64,
    ) -> StoreResult<Option<Product>>;

    /// Every record, in storage order.
    async fn get_all(&self) -> StoreResult<Vec<Product>>;

    /// Validates and persists a new record. Duplicate keys are not rejected.
    async fn add(&self, product: &Product) -> StoreResult<()>;

    /// Replaces quantity and price of every record with the product's
    /// composite key. Returns whether anything matched.
    async fn update(&self, product: &Product) -> StoreResult<bool>;

    /// Removes every record with the product's composite key. Returns
    /// whether anything matched.
    async fn delete(&self, product: &Product) -> StoreResult<bool>;

    /// Every record held by `store_id`, in storage order.
    async fn get_by_store_id(&self, store_id: i64) -> StoreResult<Vec<Product>>;

    /// The single cheapest record named `item_name` across all stores
    /// (zero or one element).
    async fn cheapest_for_item(&self, item_name: &str) -> StoreResult<Vec<Product>> {
        validate_product_name(item_name)?;

        let products = self.get_all().await?;
        Ok(pricing::cheapest_for_item(&products, item_name)
            .into_iter()
            .collect())
    }

    /// Records of `store_id` whose unit price is at most `amount`.
    async fn affordable_for_amount(
        &self,
        store_id: i64,
        amount: Money,
    ) -> StoreResult<Vec<Product>> {
        validate_store_id(store_id)?;
        validate_amount(amount)?;

        let products = self.get_by_store_id(store_id).await?;
        Ok(pricing::affordable_for_amount(&products, store_id, amount))
    }

    /// Prices a basket against one store. Unknown lines are skipped and
    /// stock is never touched.
    async fn purchase_products_from_store(
        &self,
        store_id: i64,
        basket: &Basket,
    ) -> StoreResult<Money> {
        validate_store_id(store_id)?;
        validate_basket(basket)?;

        let products = self.get_by_store_id(store_id).await?;
        Ok(pricing::price_basket(&products, store_id, basket)?)
    }

    /// Prices a basket and deducts the stock it takes, all or nothing.
    ///
    /// ## Errors
    /// - `InvalidArgument`: bad store id, empty basket, negative quantity
    /// - `ConsistencyFailure`: a line names a product the store lacks
    /// - `InsufficientStock`: a line asks for more than recorded
    async fn total_price_for_products_in_store(
        &self,
        store_id: i64,
        basket: &Basket,
    ) -> StoreResult<Money>;
}

/// Preconditions of `delete`: the composite key must be well formed.
pub(crate) fn validate_key(name: &str, store_id: i64) -> ValidationResult<()> {
    validate_store_id(store_id)?;
    validate_product_name(name)
}

/// Preconditions of `total_price_for_products_in_store`.
pub(crate) fn validate_checkout(store_id: i64, basket: &Basket) -> ValidationResult<()> {
    validate_store_id(store_id)?;
    validate_basket(basket)?;
    validate_basket_quantities(basket)
}
