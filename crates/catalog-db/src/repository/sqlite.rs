//! # SQLite Product Store
//!
//! Products kept in one `Products` table, every statement parameterized.
//!
//! ## Table
//! ```text
//! ┌──────────────┬──────────┬──────────┬───────────────────────────────┐
//! │ ProductName  │ StoreId  │ Quantity │ Price                         │
//! │ TEXT         │ INTEGER  │ INTEGER  │ INTEGER (cents, exact)        │
//! └──────────────┴──────────┴──────────┴───────────────────────────────┘
//!   no primary key: the composite key is not unique, rowid gives order
//! ```
//!
//! ## Checkout Transaction
//! ```text
//! BEGIN
//!   for each basket line:
//!     SELECT rowid, Price, Quantity ... (name, store) LIMIT 1
//!       ├── no row         → ROLLBACK, ConsistencyFailure
//!       ├── qty > Quantity → ROLLBACK, InsufficientStock
//!       └── UPDATE Quantity = Quantity - qty WHERE rowid = ?
//! COMMIT
//! ```

use async_trait::async_trait;
use catalog_core::validation::{
    validate_amount, validate_basket, validate_product_name, validate_store_id,
};
use catalog_core::{pricing, Basket, CoreError, Money, Product};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{validate_checkout, validate_key, ProductStore};

const SELECT_PRODUCTS: &str = "SELECT ProductName, StoreId, Quantity, Price FROM Products";

/// Product store backed by a SQLite pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./data/catalog.db")).await?;
/// let store = db.products();
///
/// let apples = store.get_by_store_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Creates a store over an existing pool. The schema must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProductStore { pool }
    }

    /// Number of records in the table.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        validate_product_name(name)?;

        let sql = format!("{SELECT_PRODUCTS} WHERE ProductName = ?1 ORDER BY rowid LIMIT 1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn get_by_name_and_store_id(
        &self,
        name: &str,
        store_id: i64,
    ) -> StoreResult<Option<Product>> {
        validate_key(name, store_id)?;

        let sql = format!(
            "{SELECT_PRODUCTS} WHERE ProductName = ?1 AND StoreId = ?2 ORDER BY rowid LIMIT 1"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("{SELECT_PRODUCTS} ORDER BY rowid");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn add(&self, product: &Product) -> StoreResult<()> {
        product.validate()?;

        sqlx::query(
            "INSERT INTO Products (ProductName, StoreId, Quantity, Price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&product.product_name)
        .bind(product.store_id)
        .bind(product.quantity)
        .bind(product.price)
        .execute(&self.pool)
        .await?;

        debug!(name = %product.product_name, store_id = product.store_id, "Inserted product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> StoreResult<bool> {
        product.validate()?;

        let result = sqlx::query(
            "UPDATE Products SET Quantity = ?3, Price = ?4 WHERE ProductName = ?1 AND StoreId = ?2",
        )
        .bind(&product.product_name)
        .bind(product.store_id)
        .bind(product.quantity)
        .bind(product.price)
        .execute(&self.pool)
        .await?;

        let matched = result.rows_affected();
        debug!(name = %product.product_name, store_id = product.store_id, matched, "Updated product");
        Ok(matched > 0)
    }

    async fn delete(&self, product: &Product) -> StoreResult<bool> {
        validate_key(&product.product_name, product.store_id)?;

        let result = sqlx::query("DELETE FROM Products WHERE ProductName = ?1 AND StoreId = ?2")
            .bind(&product.product_name)
            .bind(product.store_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        debug!(name = %product.product_name, store_id = product.store_id, removed, "Deleted product");
        Ok(removed > 0)
    }

    async fn get_by_store_id(&self, store_id: i64) -> StoreResult<Vec<Product>> {
        validate_store_id(store_id)?;

        let sql = format!("{SELECT_PRODUCTS} WHERE StoreId = ?1 ORDER BY rowid");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn cheapest_for_item(&self, item_name: &str) -> StoreResult<Vec<Product>> {
        validate_product_name(item_name)?;

        let sql = format!(
            "{SELECT_PRODUCTS} WHERE ProductName = ?1 ORDER BY Price ASC, rowid ASC LIMIT 1"
        );
        let cheapest = sqlx::query_as::<_, Product>(&sql)
            .bind(item_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cheapest.into_iter().collect())
    }

    async fn affordable_for_amount(
        &self,
        store_id: i64,
        amount: Money,
    ) -> StoreResult<Vec<Product>> {
        validate_store_id(store_id)?;
        validate_amount(amount)?;

        let sql = format!("{SELECT_PRODUCTS} WHERE StoreId = ?1 AND Price <= ?2 ORDER BY rowid");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(amount)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn purchase_products_from_store(
        &self,
        store_id: i64,
        basket: &Basket,
    ) -> StoreResult<Money> {
        validate_store_id(store_id)?;
        validate_basket(basket)?;

        // Read-only, but one transaction gives every line the same snapshot.
        let mut tx = self.pool.begin().await?;
        let mut total = Money::zero();

        for (name, qty) in basket.iter() {
            let price: Option<Money> = sqlx::query_scalar(
                "SELECT Price FROM Products WHERE ProductName = ?1 AND StoreId = ?2 \
                 ORDER BY rowid LIMIT 1",
            )
            .bind(name)
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(price) = price else {
                debug!(name, store_id, "Skipping product not stocked by store");
                continue;
            };

            match add_to_total(total, price, qty, name) {
                Ok(sum) => total = sum,
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e.into());
                }
            }
        }

        tx.commit().await?;
        Ok(total)
    }

    async fn total_price_for_products_in_store(
        &self,
        store_id: i64,
        basket: &Basket,
    ) -> StoreResult<Money> {
        validate_checkout(store_id, basket)?;

        let mut tx = self.pool.begin().await?;
        let mut total = Money::zero();

        for (name, qty) in basket.iter() {
            let row: Option<(i64, Money, i64)> = sqlx::query_as(
                "SELECT rowid, Price, Quantity FROM Products \
                 WHERE ProductName = ?1 AND StoreId = ?2 ORDER BY rowid LIMIT 1",
            )
            .bind(name)
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some((rowid, price, stock)) = row else {
                tx.rollback().await?;
                warn!(name, store_id, "Checkout rolled back: product not in store");
                return Err(CoreError::ProductNotInStore {
                    product: name.to_string(),
                    store_id,
                }
                .into());
            };

            if qty > stock {
                tx.rollback().await?;
                warn!(name, store_id, stock, qty, "Checkout rolled back: insufficient stock");
                return Err(StoreError::InsufficientStock {
                    product: name.to_string(),
                    store_id,
                    available: stock,
                    requested: qty,
                });
            }

            match add_to_total(total, price, qty, name) {
                Ok(sum) => total = sum,
                Err(e) => {
                    tx.rollback().await?;
                    warn!(name, store_id, "Checkout rolled back: total overflows");
                    return Err(e.into());
                }
            }

            sqlx::query("UPDATE Products SET Quantity = ?1 WHERE rowid = ?2")
                .bind(stock - qty)
                .bind(rowid)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(store_id, lines = basket.len(), total = %total, "Basket checked out");
        Ok(total)
    }
}

/// Adds `qty` units at `price` to a basket total, failing on overflow.
fn add_to_total(total: Money, price: Money, qty: i64, name: &str) -> Result<Money, CoreError> {
    let line = price
        .checked_multiply_quantity(qty)
        .ok_or_else(|| CoreError::TotalOverflow {
            product: name.to_string(),
        })?;
    pricing::add_line(total, line, name)
}

// =============================================================================
// Unit Tests
// =============================================================================
