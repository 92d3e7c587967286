//! # catalog-db: Storage Layer for the Catalog
//!
//! This crate owns every read and write against a storage medium. Callers
//! hold an `Arc<dyn ProductStore>` and never learn which backend is behind
//! it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  catalog-cli (menu / subcommand)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    config     │    │  ProductStore │    │  Migrations  │  │   │
//! │  │   │               │    │   (store.rs)  │    │  (embedded)  │  │   │
//! │  │   │ SOURCE, PATH  │───►│               │    │              │  │   │
//! │  │   │ open_store()  │    │ FileStore     │    │ 001_create_  │  │   │
//! │  │   │               │    │ SqliteStore ──┼───►│ products.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  products.csv                        catalog.db                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `ProductStore` contract
//! - [`repository`] - Flat-file and SQLite implementations
//! - [`config`] - Backend selection and the `open_store` factory
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types and the shared error taxonomy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{open_store, StoreConfig};
//!
//! let config = StoreConfig::load("config.property")?;
//! let store = open_store(&config).await?;
//!
//! let cheapest = store.cheapest_for_item("Apple").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{open_store, ConfigError, Source, StoreConfig};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use store::ProductStore;

// Repository re-exports for convenience
pub use repository::{FileProductStore, SqliteProductStore};
