//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Connection Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Pool, Every Operation                          │
//! │                                                                         │
//! │  DbConfig::new(target) ← path, sqlite: URL, or :memory:                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐               │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...           │                           │
//! │  │  └─────┘ └─────┘ └─────┘               │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteProductStore: every query and every transaction                 │
//! │  borrows from this pool; nothing opens a side connection               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL mode so a reader never blocks the single
//! writer. In-memory databases keep the default journal.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::sqlite::SqliteProductStore;

/// Target string selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/catalog.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// File path, `sqlite:` URL, or `:memory:`.
    pub target: String,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Age at which a connection is replaced. `None` never replaces.
    /// Default: 30 minutes
    pub max_lifetime: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration for the given target.
    ///
    /// ## Arguments
    /// * `target` - Path to the SQLite file (created if missing), a
    ///   `sqlite:` URL, or `:memory:`. In-memory targets get the
    ///   [`DbConfig::in_memory`] pool settings.
    pub fn new(target: impl Into<String>) -> Self {
        let config = DbConfig {
            target: target.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            run_migrations: true,
        };

        if config.is_in_memory() {
            DbConfig {
                target: config.target,
                ..DbConfig::in_memory()
            }
        } else {
            config
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// A single connection that is never closed or replaced: an in-memory
    /// database lives only as long as its connection.
    pub fn in_memory() -> Self {
        DbConfig {
            target: IN_MEMORY.to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        let target = self.target.trim();
        target == IN_MEMORY || target.ends_with(":memory:") || target.contains("mode=memory")
    }

    /// Builds sqlx connect options from the target string.
    fn connect_options(&self) -> StoreResult<SqliteConnectOptions> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(StoreError::ConnectionFailed(
                "empty database target".to_string(),
            ));
        }

        let options = if target.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(target)
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else if target == IN_MEMORY {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(target)
        };

        let mut options = options.create_if_missing(true);

        if !self.is_in_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Database handle owning the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates the connection pool and, if enabled, applies migrations.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(StoreError)` - Connection or migration failed
    pub async fn new(config: DbConfig) -> StoreResult<Self> {
        info!(target = %config.target, "Initializing database connection");

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product store sharing this pool.
    pub fn products(&self) -> SqliteProductStore {
        SqliteProductStore::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all store operations fail with
    /// `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        let db = Database::new(DbConfig::new(path.display().to_string()))
            .await
            .unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test catalog.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());

        let memory = DbConfig::new("sqlite::memory:");
        assert_eq!(memory.max_connections, 1);
        assert!(memory.max_lifetime.is_none());
    }

    #[test]
    fn test_empty_target_rejected() {
        assert!(DbConfig::new("  ").connect_options().is_err());
    }
}
