//! One-shot subcommands: run one store operation and render the result.

use catalog_core::{Money, Product};
use catalog_db::ProductStore;

use crate::cli::{basket, Command};
use crate::output::Format;

/// Runs `cmd` against `store` and returns the rendered result.
pub async fn execute(
    store: &dyn ProductStore,
    cmd: Command,
    format: Format,
) -> anyhow::Result<String> {
    let rendered = match cmd {
        Command::Get { name, store: None } => {
            let found = store.get_by_name(&name).await?;
            format.product(found.as_ref())?
        }
        Command::Get {
            name,
            store: Some(store_id),
        } => {
            let found = store.get_by_name_and_store_id(&name, store_id).await?;
            format.product(found.as_ref())?
        }
        Command::List => format.products("Product", &store.get_all().await?)?,
        Command::Add {
            name,
            store_id,
            quantity,
            price,
        } => {
            store
                .add(&Product::new(name, store_id, quantity, price))
                .await?;
            format.outcome(true, "Product added successfully")?
        }
        Command::Update {
            name,
            store_id,
            quantity,
            price,
        } => {
            let changed = store
                .update(&Product::new(name, store_id, quantity, price))
                .await?;
            format.outcome(changed, "Product updated successfully")?
        }
        Command::Delete { name, store_id } => {
            let changed = store
                .delete(&Product::new(name, store_id, 0, Money::zero()))
                .await?;
            format.outcome(changed, "Product deleted successfully")?
        }
        Command::Store { store_id } => {
            format.products("Product", &store.get_by_store_id(store_id).await?)?
        }
        Command::Cheapest { item } => {
            format.products("Product", &store.cheapest_for_item(&item).await?)?
        }
        Command::Purchase { store_id, items } => {
            let total = store
                .purchase_products_from_store(store_id, &basket(items))
                .await?;
            format.total("Total price for the purchase", total)?
        }
        Command::Affordable { store_id, amount } => {
            let items = store.affordable_for_amount(store_id, amount).await?;
            format.products("Affordable product", &items)?
        }
        Command::Checkout { store_id, items } => {
            let total = store
                .total_price_for_products_in_store(store_id, &basket(items))
                .await?;
            format.total("Total price for the products in store", total)?
        }
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::{open_store, ErrorKind, Source, StoreConfig, StoreError};
    use std::sync::Arc;

    async fn store() -> Arc<dyn ProductStore> {
        open_store(&StoreConfig::new(Source::Database, ":memory:"))
            .await
            .unwrap()
    }

    fn add_apple() -> Command {
        Command::Add {
            name: "Apple".to_string(),
            store_id: 1,
            quantity: 10,
            price: Money::from_cents(200),
        }
    }

    #[tokio::test]
    async fn test_add_then_checkout() {
        let store = store().await;
        let out = execute(store.as_ref(), add_apple(), Format::Text)
            .await
            .unwrap();
        assert_eq!(out, "Product added successfully");

        let out = execute(
            store.as_ref(),
            Command::Checkout {
                store_id: 1,
                items: vec![("Apple".to_string(), 3)],
            },
            Format::Text,
        )
        .await
        .unwrap();
        assert_eq!(out, "Total price for the products in store: 6.00");

        let out = execute(
            store.as_ref(),
            Command::Get {
                name: "Apple".to_string(),
                store: Some(1),
            },
            Format::Text,
        )
        .await
        .unwrap();
        assert_eq!(out, "Product found: Apple, Store: 1, Quantity: 7, Price: 2.00");
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let store = store().await;
        let out = execute(
            store.as_ref(),
            Command::Delete {
                name: "Apple".to_string(),
                store_id: 1,
            },
            Format::Text,
        )
        .await
        .unwrap();
        assert_eq!(out, "Product not found");
    }

    #[tokio::test]
    async fn test_store_errors_surface_with_kind() {
        let store = store().await;
        let err = execute(
            store.as_ref(),
            Command::Store { store_id: 0 },
            Format::Text,
        )
        .await
        .unwrap_err();

        let kind = err.downcast_ref::<StoreError>().map(StoreError::kind);
        assert_eq!(kind, Some(ErrorKind::InvalidArgument));
    }
}
