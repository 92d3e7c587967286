//! Behaviour every `ProductStore` backend must share.
//!
//! Each test runs the same scenario against a fresh flat-file store and a
//! fresh in-memory SQLite store.

use std::sync::Arc;

use catalog_core::{Basket, Money, Product};
use catalog_db::{open_store, ErrorKind, ProductStore, Source, StoreConfig};
use tempfile::TempDir;

struct Backend {
    // Keeps the flat file alive for the duration of the test.
    _dir: Option<TempDir>,
    store: Arc<dyn ProductStore>,
}

async fn backends() -> Vec<Backend> {
    let csv_dir = tempfile::tempdir().unwrap();
    let csv = StoreConfig::new(
        Source::Csv,
        csv_dir.path().join("products.csv").display().to_string(),
    );
    let csv_store = open_store(&csv).await.unwrap();

    let db_store = open_store(&StoreConfig::new(Source::Database, ":memory:"))
        .await
        .unwrap();

    vec![
        Backend {
            _dir: Some(csv_dir),
            store: csv_store,
        },
        Backend {
            _dir: None,
            store: db_store,
        },
    ]
}

fn product(name: &str, store_id: i64, quantity: i64, cents: i64) -> Product {
    Product::new(name, store_id, quantity, Money::from_cents(cents))
}

fn apple() -> Product {
    product("Apple", 1, 10, 200)
}

#[tokio::test]
async fn add_then_lookup_by_composite_key() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        store.add(&product("Apple", 2, 4, 150)).await.unwrap();

        let found = store.get_by_name_and_store_id("Apple", 1).await.unwrap();
        assert_eq!(found, Some(apple()), "{b}");

        let found = store.get_by_name_and_store_id("Apple", 2).await.unwrap();
        assert_eq!(found.map(|p| p.quantity), Some(4), "{b}");

        assert_eq!(store.get_by_name_and_store_id("Apple", 3).await.unwrap(), None, "{b}");
    }
}

#[tokio::test]
async fn get_by_name_returns_first_in_storage_order() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&product("Apple", 2, 4, 150)).await.unwrap();
        store.add(&apple()).await.unwrap();

        let first = store.get_by_name("Apple").await.unwrap().unwrap();
        assert_eq!(first.store_id, 2, "{b}");
        assert_eq!(store.get_by_name("Kiwi").await.unwrap(), None, "{b}");
    }
}

#[tokio::test]
async fn get_all_and_by_store_keep_insertion_order() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        assert!(store.get_all().await.unwrap().is_empty(), "{b}");

        store.add(&apple()).await.unwrap();
        store.add(&product("Melon", 2, 1, 450)).await.unwrap();
        store.add(&product("Pear", 1, 5, 120)).await.unwrap();

        let names: Vec<_> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, ["Apple", "Melon", "Pear"], "{b}");

        let store_one = store.get_by_store_id(1).await.unwrap();
        assert_eq!(store_one.len(), 2, "{b}");
        assert!(store_one.iter().all(|p| p.store_id == 1), "{b}");
        assert!(store.get_by_store_id(9).await.unwrap().is_empty(), "{b}");
    }
}

#[tokio::test]
async fn invalid_products_are_rejected_before_any_write() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        let invalid = [
            product("", 1, 1, 100),
            product("   ", 1, 1, 100),
            product("Apple", 1, -1, 100),
            product("Apple", 1, 1, -1),
            product("Apple", 0, 1, 100),
            product("Apple", -2, 1, 100),
        ];

        for p in &invalid {
            let err = store.add(p).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{b}: {p:?}");
        }
        assert!(store.get_all().await.unwrap().is_empty(), "{b}");

        store.add(&apple()).await.unwrap();
        let err = store.update(&product("Apple", 1, -5, 200)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{b}");
        assert_eq!(store.get_all().await.unwrap(), vec![apple()], "{b}");
    }
}

#[tokio::test]
async fn lookups_validate_arguments() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        assert_eq!(
            store.get_by_name("").await.unwrap_err().kind(),
            ErrorKind::InvalidArgument,
            "{b}"
        );
        assert_eq!(
            store.get_by_store_id(0).await.unwrap_err().kind(),
            ErrorKind::InvalidArgument,
            "{b}"
        );
        for name in ["", " "] {
            assert_eq!(
                store.cheapest_for_item(name).await.unwrap_err().kind(),
                ErrorKind::InvalidArgument,
                "{b}"
            );
        }
        for (name, store_id) in [("", 1), ("Apple", 0), ("Apple", -1)] {
            assert_eq!(
                store
                    .get_by_name_and_store_id(name, store_id)
                    .await
                    .unwrap_err()
                    .kind(),
                ErrorKind::InvalidArgument,
                "{b}"
            );
        }
        assert_eq!(
            store
                .affordable_for_amount(0, Money::from_cents(500))
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument,
            "{b}"
        );
        assert_eq!(
            store
                .affordable_for_amount(1, Money::from_cents(-1))
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument,
            "{b}"
        );
        assert_eq!(
            store
                .purchase_products_from_store(0, &Basket::new().with("Apple", 1))
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument,
            "{b}"
        );
    }
}

#[tokio::test]
async fn update_and_delete_on_missing_key_are_noops() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();

        assert!(!store.update(&product("Apple", 2, 1, 100)).await.unwrap(), "{b}");
        assert!(!store.update(&product("Kiwi", 1, 1, 100)).await.unwrap(), "{b}");
        assert!(!store.delete(&product("Apple", 2, 0, 0)).await.unwrap(), "{b}");
        assert_eq!(store.get_all().await.unwrap(), vec![apple()], "{b}");

        assert!(store.update(&product("Apple", 1, 8, 210)).await.unwrap(), "{b}");
        let updated = store.get_by_name_and_store_id("Apple", 1).await.unwrap().unwrap();
        assert_eq!((updated.quantity, updated.price), (8, Money::from_cents(210)), "{b}");

        assert!(store.delete(&apple()).await.unwrap(), "{b}");
        assert!(store.get_all().await.unwrap().is_empty(), "{b}");
    }
}

#[tokio::test]
async fn cheapest_is_single_global_minimum() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        store.add(&product("Apple", 2, 4, 150)).await.unwrap();
        store.add(&product("Apple", 3, 9, 150)).await.unwrap();
        store.add(&product("Pear", 1, 5, 10)).await.unwrap();

        let cheapest = store.cheapest_for_item("Apple").await.unwrap();
        assert_eq!(cheapest.len(), 1, "{b}");
        assert_eq!(cheapest[0].store_id, 2, "{b}");

        assert!(store.cheapest_for_item("Kiwi").await.unwrap().is_empty(), "{b}");
    }
}

#[tokio::test]
async fn affordable_returns_store_products_within_amount() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        store.add(&product("Pear", 1, 5, 120)).await.unwrap();
        store.add(&product("Melon", 1, 1, 450)).await.unwrap();
        store.add(&product("Plum", 2, 1, 50)).await.unwrap();

        let names = |items: Vec<Product>| -> Vec<String> {
            items.into_iter().map(|p| p.product_name).collect()
        };

        let items = store
            .affordable_for_amount(1, Money::from_cents(200))
            .await
            .unwrap();
        assert_eq!(names(items), ["Apple", "Pear"], "{b}");

        let items = store
            .affordable_for_amount(1, Money::from_cents(119))
            .await
            .unwrap();
        assert!(items.is_empty(), "{b}");

        let err = store
            .affordable_for_amount(1, Money::from_cents(-1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{b}");
    }
}

#[tokio::test]
async fn purchase_prices_without_touching_stock() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();

        let total = store
            .purchase_products_from_store(1, &Basket::new().with("Apple", 3))
            .await
            .unwrap();
        assert_eq!(total, Money::from_cents(600), "{b}");

        let stock = store.get_by_name_and_store_id("Apple", 1).await.unwrap().unwrap();
        assert_eq!(stock.quantity, 10, "{b}");
    }
}

#[tokio::test]
async fn purchase_skips_products_missing_from_store() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        store.add(&product("Banana", 2, 5, 80)).await.unwrap();

        let total = store
            .purchase_products_from_store(1, &Basket::new().with("Banana", 1))
            .await
            .unwrap();
        assert_eq!(total, Money::zero(), "{b}");

        let total = store
            .purchase_products_from_store(1, &Basket::new().with("Apple", 1).with("Kiwi", 4))
            .await
            .unwrap();
        assert_eq!(total, Money::from_cents(200), "{b}");

        let err = store
            .purchase_products_from_store(1, &Basket::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{b}");
    }
}

#[tokio::test]
async fn checkout_deducts_stock() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();

        let total = store
            .total_price_for_products_in_store(1, &Basket::new().with("Apple", 3))
            .await
            .unwrap();
        assert_eq!(total, Money::from_cents(600), "{b}");

        let stock = store.get_by_name_and_store_id("Apple", 1).await.unwrap().unwrap();
        assert_eq!(stock.quantity, 7, "{b}");

        // Taking the exact remainder is allowed.
        store
            .total_price_for_products_in_store(1, &Basket::new().with("Apple", 7))
            .await
            .unwrap();
        let stock = store.get_by_name_and_store_id("Apple", 1).await.unwrap().unwrap();
        assert_eq!(stock.quantity, 0, "{b}");
    }
}

#[tokio::test]
async fn checkout_over_stock_changes_nothing() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        store.add(&product("Pear", 1, 2, 120)).await.unwrap();
        let before = store.get_all().await.unwrap();

        let basket = Basket::new().with("Apple", 4).with("Pear", 3);
        let err = store
            .total_price_for_products_in_store(1, &basket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock, "{b}");

        assert_eq!(store.get_all().await.unwrap(), before, "{b}");
    }
}

#[tokio::test]
async fn checkout_of_product_missing_from_store_rolls_back() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();
        let before = store.get_all().await.unwrap();

        // Banana exists nowhere.
        let basket = Basket::new().with("Apple", 2).with("Banana", 1);
        let err = store
            .total_price_for_products_in_store(1, &basket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyFailure, "{b}");
        assert_eq!(store.get_all().await.unwrap(), before, "{b}");

        // Banana exists only in another store.
        store.add(&product("Banana", 2, 5, 80)).await.unwrap();
        let before = store.get_all().await.unwrap();
        let err = store
            .total_price_for_products_in_store(1, &basket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyFailure, "{b}");
        assert_eq!(store.get_all().await.unwrap(), before, "{b}");
    }
}

#[tokio::test]
async fn checkout_validates_before_touching_storage() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        store.add(&apple()).await.unwrap();

        let cases = [
            (1, Basket::new()),
            (0, Basket::new().with("Apple", 1)),
            (1, Basket::new().with("Apple", 1).with("Zucchini", -1)),
        ];
        for (store_id, basket) in cases {
            let err = store
                .total_price_for_products_in_store(store_id, &basket)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{b}");
        }

        assert_eq!(store.get_all().await.unwrap(), vec![apple()], "{b}");
    }
}

#[tokio::test]
async fn basket_total_overflow_fails_without_changes() {
    for Backend { store, .. } in backends().await {
        let b = store.backend();
        let huge = Money::from_cents(5_000_000_000_000_000_000);
        store.add(&Product::new("A", 1, 1, huge)).await.unwrap();
        store.add(&Product::new("B", 1, 1, huge)).await.unwrap();
        let before = store.get_all().await.unwrap();
        let basket = Basket::new().with("A", 1).with("B", 1);

        let err = store
            .purchase_products_from_store(1, &basket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyFailure, "{b}");

        let err = store
            .total_price_for_products_in_store(1, &basket)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConsistencyFailure, "{b}");
        assert_eq!(store.get_all().await.unwrap(), before, "{b}");
    }
}
