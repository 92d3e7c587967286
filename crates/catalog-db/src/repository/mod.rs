//! # Repository Module
//!
//! The two `ProductStore` backends.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ProductStore                                   │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                        │
//! │              ▼                                 ▼                        │
//! │     FileProductStore                  SqliteProductStore                │
//! │     SOURCE=csv                        SOURCE=database                   │
//! │     record.rs: line codec             Products table, sqlx pool         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`FileProductStore`] - one flat file, writers serialized by a lock
//! - [`SqliteProductStore`] - SQLite table, basket checkout in a transaction

pub mod file;
pub mod record;
pub mod sqlite;

pub use file::FileProductStore;
pub use sqlite::SqliteProductStore;
