//! # Seed Data Generator
//!
//! Fills the configured backend with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the backend named by ./config.property (60 records)
//! cargo run -p catalog-db --bin seed
//!
//! # Custom amount and config file
//! cargo run -p catalog-db --bin seed -- --count 200 --config ./conf/config.property
//! ```
//!
//! ## Generated Products
//! Each product name is stocked by several stores at different prices, so
//! the cheapest-for-item and affordable queries have something to compare:
//! - Store ids 1 to 4
//! - Price: 0.49 - 12.48, varying per store
//! - Stock: 0 - 40

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use catalog_core::{Money, Product};
use catalog_db::config::DEFAULT_CONFIG_FILE;
use catalog_db::migrations::migration_status;
use catalog_db::{open_store, Database, DbConfig, ProductStore, Source, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Product names for demo data
const PRODUCTS: &[&str] = &[
    "Apple",
    "Banana",
    "Pear",
    "Orange",
    "Milk",
    "Bread",
    "Eggs Dozen",
    "Butter",
    "Cheddar Cheese",
    "Greek Yogurt",
    "Coffee",
    "Orange Juice",
    "Pasta Penne",
    "Rice White",
    "Canned Beans",
    "Peanut Butter",
    "Honey",
    "Oatmeal",
    "Frozen Pizza",
    "Ice Cream",
];

const STORES: i64 = 4;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of records to generate (default: 60)");
                println!("      --config <FILE>  Main property file (default: ./config.property)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = StoreConfig::load(&config_path)?;

    println!("Catalog Seed Data Generator");
    println!("===========================");
    println!("Backend: {} ({})", config.source, config.path);

    let store: Arc<dyn ProductStore> = match config.source {
        Source::Database => {
            let db = Database::new(DbConfig::new(config.path.as_str())).await?;
            if !db.health_check().await {
                return Err("database is not answering queries".into());
            }
            let (total, applied) = migration_status(db.pool()).await?;
            println!("Schema:  {}/{} migrations applied", applied, total);
            Arc::new(db.products())
        }
        Source::Csv => open_store(&config).await?,
    };

    println!("Records: {}", count);
    println!();

    let existing = store.get_all().await?.len();
    if existing > 0 {
        println!("Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let product = generate_product(seed);

        if let Err(e) = store.add(&product).await {
            warn!(name = %product.product_name, store_id = product.store_id, error = %e, "Failed to insert");
            continue;
        }

        generated += 1;
        if generated % 50 == 0 {
            info!(generated, "Seeding in progress");
        }
    }

    println!("Generated {} products in {:?}", generated, start.elapsed());

    // Sanity check the aggregation path on the fresh data.
    let cheapest = store.cheapest_for_item(PRODUCTS[0]).await?;
    if let Some(p) = cheapest.first() {
        println!("  Cheapest {}: {} at store {}", p.product_name, p.price, p.store_id);
    }

    println!("Seed complete!");
    Ok(())
}

/// Builds one demo record. Consecutive seeds walk the stores first, so the
/// same product appears in every store before the next name starts.
fn generate_product(seed: usize) -> Product {
    let seed = seed as i64;
    let name_idx = (seed / STORES) as usize % PRODUCTS.len();
    let store_id = seed % STORES + 1;

    let mut name = PRODUCTS[name_idx].to_string();
    let round = seed / (STORES * PRODUCTS.len() as i64);
    if round > 0 {
        name = format!("{} #{}", name, round + 1);
    }

    let price = Money::from_cents(49 + (seed * 37) % 1200);
    let quantity = (seed * 7) % 41;

    Product::new(name, store_id, quantity, price)
}
