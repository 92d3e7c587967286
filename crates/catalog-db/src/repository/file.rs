//! # Flat-File Product Store
//!
//! Products kept in a single comma-delimited text file (see [`record`] for
//! the line format).
//!
//! ## Read / Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    FileProductStore                                     │
//! │                                                                         │
//! │  Readers (get_*)              Writers (add / update / delete / checkout)│
//! │  ─────────────────            ──────────────────────────────────────────│
//! │  read whole file              acquire write_lock  ◄── injectable,       │
//! │  parse every line                  │                  Arc<Mutex<()>>    │
//! │  no lock, no cache                 ├── add: append one line             │
//! │                                    │                                    │
//! │                                    └── others: read all, modify,        │
//! │                                        write temp file, rename over     │
//! │                               guard dropped on every exit path          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers are not blocked by the lock. A reader racing a rewrite sees
//! either the old or the new file because the rewrite lands with a rename.
//!
//! [`record`]: super::record

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::validation::{validate_product_name, validate_store_id};
use catalog_core::{pricing, Basket, Money, Product};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::record;
use crate::error::StoreResult;
use crate::store::{validate_checkout, validate_key, ProductStore};

/// Product store backed by one flat file.
///
/// ## Usage
/// ```rust,ignore
/// let store = FileProductStore::open("./data/products.csv").await?;
/// store.add(&Product::new("Apple", 1, 10, "2.00".parse()?)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FileProductStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileProductStore {
    /// Opens the store with a lock of its own.
    ///
    /// Creates the file (header only) and any missing parent directories.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_lock(path, Arc::new(Mutex::new(()))).await
    }

    /// Opens the store serializing writers on `write_lock`.
    ///
    /// Handles opened over the same file should share one lock.
    pub async fn with_lock(path: impl Into<PathBuf>, write_lock: Arc<Mutex<()>>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                file.write_all(record::encode_all(&[])?.as_bytes()).await?;
                file.flush().await?;
                info!(path = %path.display(), "Created product file");
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                info!(path = %path.display(), "Opened product file");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(FileProductStore { path, write_lock })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the whole file.
    async fn read_all(&self) -> StoreResult<Vec<Product>> {
        let contents = fs::read_to_string(&self.path).await?;
        record::decode_all(&self.path, &contents)
    }

    /// Replaces the whole file. Caller must hold the write lock.
    async fn rewrite(&self, products: &[Product]) -> StoreResult<()> {
        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(record::encode_all(products)?.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), records = products.len(), "Rewrote product file");
        Ok(())
    }
}

#[async_trait]
impl ProductStore for FileProductStore {
    fn backend(&self) -> &'static str {
        "csv"
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        validate_product_name(name)?;

        let products = self.read_all().await?;
        Ok(products.into_iter().find(|p| p.product_name == name))
    }

    async fn get_by_name_and_store_id(
        &self,
        name: &str,
        store_id: i64,
    ) -> StoreResult<Option<Product>> {
        validate_key(name, store_id)?;

        let products = self.read_all().await?;
        Ok(products.into_iter().find(|p| p.has_key(name, store_id)))
    }

    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        self.read_all().await
    }

    async fn add(&self, product: &Product) -> StoreResult<()> {
        product.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        // Start on a fresh line even if the file was hand-edited without a
        // trailing newline; a file deleted under us gets its header back.
        let mut line = String::new();
        let len = file.metadata().await?.len();
        if len == 0 {
            line.push_str(&record::header());
            line.push('\n');
        } else {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                line.push('\n');
            }
        }
        line.push_str(&record::encode(product)?);
        line.push('\n');

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(name = %product.product_name, store_id = product.store_id, "Appended product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> StoreResult<bool> {
        product.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut products = self.read_all().await?;
        let mut matched = 0;
        for existing in products.iter_mut().filter(|p| p.same_key(product)) {
            *existing = product.clone();
            matched += 1;
        }

        if matched > 0 {
            self.rewrite(&products).await?;
        }

        debug!(name = %product.product_name, store_id = product.store_id, matched, "Updated product");
        Ok(matched > 0)
    }

    async fn delete(&self, product: &Product) -> StoreResult<bool> {
        validate_key(&product.product_name, product.store_id)?;

        let _guard = self.write_lock.lock().await;

        let mut products = self.read_all().await?;
        let before = products.len();
        products.retain(|p| !p.same_key(product));
        let removed = before - products.len();

        if removed > 0 {
            self.rewrite(&products).await?;
        }

        debug!(name = %product.product_name, store_id = product.store_id, removed, "Deleted product");
        Ok(removed > 0)
    }

    async fn get_by_store_id(&self, store_id: i64) -> StoreResult<Vec<Product>> {
        validate_store_id(store_id)?;

        let products = self.read_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.store_id == store_id)
            .collect())
    }

    async fn total_price_for_products_in_store(
        &self,
        store_id: i64,
        basket: &Basket,
    ) -> StoreResult<Money> {
        validate_checkout(store_id, basket)?;

        let _guard = self.write_lock.lock().await;

        let mut products = self.read_all().await?;
        // `checkout` leaves `products` untouched on error, so nothing is
        // written unless every line succeeded.
        let total = pricing::checkout(&mut products, store_id, basket)?;
        self.rewrite(&products).await?;

        info!(store_id, lines = basket.len(), total = %total, "Basket checked out");
        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn apple() -> Product {
        Product::new("Apple", 1, 10, Money::from_cents(200))
    }

    async fn open_temp() -> (TempDir, FileProductStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProductStore::open(dir.path().join("products.csv"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_writes_header() {
        let (_dir, store) = open_temp().await;
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "ProductName,StoreId,Quantity,Price\n");
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs_and_keeps_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/products.csv");

        let store = FileProductStore::open(&path).await.unwrap();
        store.add(&apple()).await.unwrap();

        let reopened = FileProductStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_all().await.unwrap(), vec![apple()]);
    }

    #[tokio::test]
    async fn test_add_appends_without_rewrite() {
        let (_dir, store) = open_temp().await;
        store.add(&apple()).await.unwrap();
        store
            .add(&Product::new("Pear", 2, 1, Money::from_cents(120)))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "ProductName,StoreId,Quantity,Price\nApple,1,10,2.00\nPear,2,1,1.20\n"
        );
    }

    #[tokio::test]
    async fn test_add_after_hand_edit_without_trailing_newline() {
        let (_dir, store) = open_temp().await;
        std::fs::write(
            store.path(),
            "ProductName,StoreId,Quantity,Price\nPear,2,1,1.20",
        )
        .unwrap();

        store.add(&apple()).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_record_position() {
        let (_dir, store) = open_temp().await;
        store.add(&apple()).await.unwrap();
        store
            .add(&Product::new("Pear", 1, 5, Money::from_cents(120)))
            .await
            .unwrap();

        let mut changed = apple();
        changed.price = Money::from_cents(250);
        assert!(store.update(&changed).await.unwrap());

        let all = store.get_all().await.unwrap();
        assert_eq!(all[0], changed);
        assert_eq!(all[1].product_name, "Pear");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_failure() {
        let (_dir, store) = open_temp().await;
        std::fs::write(
            store.path(),
            "ProductName,StoreId,Quantity,Price\nApple,one,10,2.00\n",
        )
        .unwrap();

        let err = store.get_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_missing_file_is_storage_failure_for_readers() {
        let (_dir, store) = open_temp().await;
        std::fs::remove_file(store.path()).unwrap();

        let err = store.get_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_concurrent_adds_all_land() {
        let (_dir, store) = open_temp().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let product = Product::new(format!("Item {i}"), 1 + i % 4, i, Money::from_cents(i * 10));
                    store.add(&product).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 64);
        for i in 0..64 {
            assert!(all.iter().any(|p| p.product_name == format!("Item {i}")));
        }
    }

    #[tokio::test]
    async fn test_shared_lock_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let lock = Arc::new(Mutex::new(()));

        let a = Arc::new(FileProductStore::with_lock(&path, Arc::clone(&lock)).await.unwrap());
        let b = Arc::new(FileProductStore::with_lock(&path, Arc::clone(&lock)).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = if i % 2 == 0 { Arc::clone(&a) } else { Arc::clone(&b) };
            handles.push(tokio::spawn(async move {
                let product = Product::new(format!("P{i}"), 1, 1, Money::from_cents(100));
                store.add(&product).await?;
                // Interleave full rewrites with appends.
                store.update(&product).await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(a.get_all().await.unwrap().len(), 20);
    }
}
