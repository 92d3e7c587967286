//! # catalog-core: Pure Domain Logic for the Catalog
//!
//! This crate holds the catalog's data shapes and rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog (CLI)                                │   │
//! │  │    Menu 1-10 ──► subcommands ──► --json output                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Arc<dyn ProductStore>                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-db                                   │   │
//! │  │    FileProductStore        SqliteProductStore                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  checkout │  │   rules   │  │   │
//! │  │   │  Basket   │  │           │  │  cheapest │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The `Product` stock record
//! - [`basket`] - Name → quantity baskets
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Pure query and basket math
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules checked before any write
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{Basket, Money, Product};
//! use catalog_core::pricing::price_basket;
//!
//! let products = vec![Product::new("Apple", 1, 10, "2.00".parse().unwrap())];
//! let basket = Basket::new().with("Apple", 3);
//!
//! let total = price_basket(&products, 1, &basket).unwrap();
//! assert_eq!(total, Money::from_cents(600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::Basket;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::Product;

/// Column order shared by the flat-file header and the SQL table.
pub const PRODUCT_COLUMNS: [&str; 4] = ["ProductName", "StoreId", "Quantity", "Price"];
