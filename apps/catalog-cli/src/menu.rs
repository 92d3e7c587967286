//! # Interactive Menu
//!
//! The numbered console loop. One operation per selection; an operation
//! error is printed as `Error: <message>` and the loop carries on.
//!
//! ```text
//! 1. Get product by name            6. Get products by store ID
//! 2. Get all products               7. Get cheapest products by store for item
//! 3. Add product                    8. Purchase products from store
//! 4. Update product                 9. Get affordable products by store for amount
//! 5. Delete product                10. Get total price for products in store
//! 0. Exit
//! ```
//!
//! Invalid input (a non-numeric store id, a malformed price) prints a short
//! message and returns to the menu. End of input exits like `0`.

use std::io;
use std::str::FromStr;
use std::sync::Arc;

use catalog_core::{Basket, Money, Product};
use catalog_db::{ProductStore, StoreResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

use crate::output::Format;

const MENU: &str = "\
1. Get product by name
2. Get all products
3. Add product
4. Update product
5. Delete product
6. Get products by store ID
7. Get cheapest products by store for item
8. Purchase products from store
9. Get affordable products by store for amount
10. Get total price for products in store
0. Exit
";

/// Menu loop over any line source and sink.
pub struct Menu<R, W> {
    store: Arc<dyn ProductStore>,
    format: Format,
    input: Lines<R>,
    out: W,
}

impl<R, W> Menu<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(store: Arc<dyn ProductStore>, format: Format, input: R, out: W) -> Self {
        Menu {
            store,
            format,
            input: input.lines(),
            out,
        }
    }

    /// Runs until `0` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            match self.step().await {
                Ok(true) => continue,
                Ok(false) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("Input closed, leaving menu");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Shows the menu and handles one selection. `false` means exit.
    async fn step(&mut self) -> io::Result<bool> {
        self.out.write_all(MENU.as_bytes()).await?;
        let option = self.prompt("Select an option: ").await?;

        match option.trim() {
            "1" => self.get_by_name().await?,
            "2" => self.get_all().await?,
            "3" => self.add().await?,
            "4" => self.update().await?,
            "5" => self.delete().await?,
            "6" => self.get_by_store_id().await?,
            "7" => self.cheapest().await?,
            "8" => self.purchase().await?,
            "9" => self.affordable().await?,
            "10" => self.total_price().await?,
            "0" => return Ok(false),
            _ => self.say("Invalid option").await?,
        }

        Ok(true)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    async fn get_by_name(&mut self) -> io::Result<()> {
        let name = self.prompt("Enter product name: ").await?;
        let result = self.store.get_by_name(name.trim()).await;
        let format = self.format;
        self.report(result, |found| format.product(found.as_ref()))
            .await
    }

    async fn get_all(&mut self) -> io::Result<()> {
        let result = self.store.get_all().await;
        let format = self.format;
        self.report(result, |items| format.products("Product", &items))
            .await
    }

    async fn add(&mut self) -> io::Result<()> {
        let Some(product) = self.read_product().await? else {
            return Ok(());
        };
        let result = self.store.add(&product).await;
        let format = self.format;
        self.report(result, |()| format.outcome(true, "Product added successfully"))
            .await
    }

    async fn update(&mut self) -> io::Result<()> {
        let Some(product) = self.read_product().await? else {
            return Ok(());
        };
        let result = self.store.update(&product).await;
        let format = self.format;
        self.report(result, |changed| {
            format.outcome(changed, "Product updated successfully")
        })
        .await
    }

    async fn delete(&mut self) -> io::Result<()> {
        let name = self.prompt("Enter product name to delete: ").await?;
        let Some(store_id) = self.read_parsed("Enter store ID: ", "Invalid store ID").await? else {
            return Ok(());
        };
        let product = Product::new(name.trim(), store_id, 0, Money::zero());
        let result = self.store.delete(&product).await;
        let format = self.format;
        self.report(result, |changed| {
            format.outcome(changed, "Product deleted successfully")
        })
        .await
    }

    async fn get_by_store_id(&mut self) -> io::Result<()> {
        let Some(store_id) = self.read_parsed("Enter store ID: ", "Invalid store ID").await? else {
            return Ok(());
        };
        let result = self.store.get_by_store_id(store_id).await;
        let format = self.format;
        self.report(result, |items| format.products("Product", &items))
            .await
    }

    async fn cheapest(&mut self) -> io::Result<()> {
        let item = self.prompt("Enter item name: ").await?;
        let result = self.store.cheapest_for_item(item.trim()).await;
        let format = self.format;
        self.report(result, |items| format.products("Product", &items))
            .await
    }

    async fn purchase(&mut self) -> io::Result<()> {
        let Some((store_id, basket)) = self.read_basket().await? else {
            return Ok(());
        };
        let result = self.store.purchase_products_from_store(store_id, &basket).await;
        let format = self.format;
        self.report(result, |total| {
            format.total("Total price for the purchase", total)
        })
        .await
    }

    async fn affordable(&mut self) -> io::Result<()> {
        let Some(store_id) = self.read_parsed("Enter store ID: ", "Invalid store ID").await? else {
            return Ok(());
        };
        let Some(amount) = self.read_parsed::<Money>("Enter amount: ", "Invalid amount").await? else {
            return Ok(());
        };
        let result = self.store.affordable_for_amount(store_id, amount).await;
        let format = self.format;
        self.report(result, |items| format.products("Affordable product", &items))
            .await
    }

    async fn total_price(&mut self) -> io::Result<()> {
        let Some((store_id, basket)) = self.read_basket().await? else {
            return Ok(());
        };
        let result = self
            .store
            .total_price_for_products_in_store(store_id, &basket)
            .await;
        let format = self.format;
        self.report(result, |total| {
            format.total("Total price for the products in store", total)
        })
        .await
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    async fn read_product(&mut self) -> io::Result<Option<Product>> {
        let name = self.prompt("Enter product name: ").await?;
        let Some(store_id) = self.read_parsed("Enter store ID: ", "Invalid store ID").await? else {
            return Ok(None);
        };
        let Some(quantity) = self.read_parsed("Enter quantity: ", "Invalid quantity").await? else {
            return Ok(None);
        };
        let Some(price) = self.read_parsed::<Money>("Enter product price: ", "Invalid price").await?
        else {
            return Ok(None);
        };

        Ok(Some(Product::new(name.trim(), store_id, quantity, price)))
    }

    async fn read_basket(&mut self) -> io::Result<Option<(i64, Basket)>> {
        let Some(store_id) = self.read_parsed("Enter store ID: ", "Invalid store ID").await? else {
            return Ok(None);
        };
        let Some(count) = self
            .read_parsed::<usize>(
                "Enter number of products to purchase: ",
                "Invalid number of products",
            )
            .await?
        else {
            return Ok(None);
        };

        let mut basket = Basket::new();
        for _ in 0..count {
            let name = self.prompt("Enter product name: ").await?;
            let Some(quantity) = self.read_parsed("Enter quantity: ", "Invalid quantity").await?
            else {
                return Ok(None);
            };
            basket.add(name.trim(), quantity);
        }

        Ok(Some((store_id, basket)))
    }

    /// Prompts and parses; prints `invalid` and yields `None` on bad input.
    async fn read_parsed<T: FromStr>(&mut self, prompt: &str, invalid: &str) -> io::Result<Option<T>> {
        let line = self.prompt(prompt).await?;
        match line.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.say(invalid).await?;
                Ok(None)
            }
        }
    }

    async fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;

        self.input
            .next_line()
            .await?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }

    /// Prints a rendered result, or `Error: <message>` for a failed operation.
    async fn report<T>(
        &mut self,
        result: StoreResult<T>,
        render: impl FnOnce(T) -> serde_json::Result<String>,
    ) -> io::Result<()> {
        let text = match result {
            Ok(value) => match render(value) {
                Ok(text) => text,
                Err(e) => format!("Error: {}", e),
            },
            Err(e) => {
                debug!(kind = %e.kind(), error = %e, "Operation failed");
                format!("Error: {}", e)
            }
        };
        self.say(&text).await
    }
}
