//! # Backend Configuration
//!
//! Selects the storage backend from key=value property files.
//!
//! ## Lookup Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two-Step Property Lookup                             │
//! │                                                                         │
//! │  config.property            SOURCE = csv                               │
//! │       │                                │                                │
//! │       │        file named after SOURCE ▼                                │
//! │       └─────────────────────────►  ./csv        PATH = ./products.csv  │
//! │                                                                         │
//! │  CATALOG_SOURCE / CATALOG_PATH override either step                    │
//! │  (a file is only read when its key is not overridden)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Format
//! `KEY = VALUE`, whitespace trimmed. Blank lines, `#` comments and lines
//! without exactly one `=` are skipped. The first occurrence of a key wins.
//!
//! Nothing falls back to a default: a missing key is an error.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::error::StoreResult;
use crate::pool::{Database, DbConfig};
use crate::repository::FileProductStore;
use crate::store::ProductStore;

/// Default main property file, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.property";

/// Environment variable overriding `SOURCE`.
pub const SOURCE_ENV: &str = "CATALOG_SOURCE";

/// Environment variable overriding `PATH`.
pub const PATH_ENV: &str = "CATALOG_PATH";

const SOURCE_KEY: &str = "SOURCE";
const PATH_KEY: &str = "PATH";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Source
// =============================================================================

/// Backend kind named by `SOURCE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Flat comma-delimited file.
    Csv,
    /// SQLite database.
    Database,
}

impl Source {
    /// The `SOURCE` value, which is also the name of the second file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Csv => "csv",
            Source::Database => "database",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Source::Csv),
            "database" => Ok(Source::Database),
            _ => Err(ConfigError::InvalidValue {
                key: SOURCE_KEY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// StoreConfig
// =============================================================================

/// Resolved backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub source: Source,
    /// File path for `csv`; path, `sqlite:` URL or `:memory:` for `database`.
    pub path: String,
}

impl StoreConfig {
    pub fn new(source: Source, path: impl Into<String>) -> Self {
        StoreConfig {
            source,
            path: path.into(),
        }
    }

    /// Loads configuration starting from `main_file`, honouring the
    /// process environment.
    ///
    /// ## Errors
    /// * `MissingRequired` - `SOURCE` or `PATH` absent or empty
    /// * `InvalidValue` - `SOURCE` is neither `csv` nor `database`
    /// * `Unreadable` - a property file that must be read cannot be
    pub fn load(main_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with(main_file.as_ref(), |key| env::var(key).ok())
    }

    /// Same as [`StoreConfig::load`] with an injectable environment.
    pub fn load_with(
        main_file: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let source_value = match non_empty(env(SOURCE_ENV)) {
            Some(value) => value,
            None => non_empty(read_properties(main_file)?.remove(SOURCE_KEY))
                .ok_or_else(|| ConfigError::MissingRequired(SOURCE_KEY.to_string()))?,
        };
        let source: Source = source_value.parse()?;

        let path = match non_empty(env(PATH_ENV)) {
            Some(value) => value,
            None => {
                let second = main_file.with_file_name(source.as_str());
                non_empty(read_properties(&second)?.remove(PATH_KEY))
                    .ok_or_else(|| ConfigError::MissingRequired(PATH_KEY.to_string()))?
            }
        };

        Ok(StoreConfig { source, path })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads a property file into a map.
fn read_properties(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_properties(&contents))
}

/// Parses `KEY = VALUE` lines. First occurrence of a key wins.
pub fn parse_properties(contents: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        properties
            .entry(key.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    properties
}

// =============================================================================
// Backend Factory
// =============================================================================

/// Opens the backend a configuration names.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::load("config.property")?;
/// let store = open_store(&config).await?;
/// println!("Using {} backend", store.backend());
/// ```
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn ProductStore>> {
    info!(source = %config.source, path = %config.path, "Opening product store");

    let store: Arc<dyn ProductStore> = match config.source {
        Source::Csv => Arc::new(FileProductStore::open(&config.path).await?),
        Source::Database => {
            let db = Database::new(DbConfig::new(config.path.as_str())).await?;
            Arc::new(db.products())
        }
    };

    Ok(store)
}

// =============================================================================
// Unit Tests
// =============================================================================
