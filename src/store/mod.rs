//! Squirrel storage module
//!
//! Defines the storage contract used by the request handler and the two
//! backends that satisfy it:
//! - `FileStore`: a serialized list of records in a single file
//! - `SqliteStore`: a `squirrels` table in a SQLite database
//!
//! A `StoreProvider` opens a fresh backend for every request.

pub mod array_file;
pub mod file;
pub mod sqlite;

pub use array_file::ArrayFile;
pub use file::FileStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Identifier assigned by the storage backend
pub type SquirrelId = i64;

/// A single squirrel record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squirrel {
    pub id: SquirrelId,
    pub name: String,
    pub size: String,
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("squirrel not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("no squirrel ids left to assign")]
    IdsExhausted,
}

impl StoreError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Operations every storage backend supports.
///
/// Ids arrive as the raw path segment from the request. Each mutating call
/// is persisted before it returns.
pub trait SquirrelStore {
    fn list_all(&self) -> Result<Vec<Squirrel>, StoreError>;

    fn get_one(&self, id: &str) -> Result<Squirrel, StoreError>;

    fn create(&mut self, name: &str, size: &str) -> Result<SquirrelId, StoreError>;

    fn update(&mut self, id: &str, name: &str, size: &str) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Opens a storage backend for a single request
pub trait StoreProvider {
    fn open(&self) -> Result<Box<dyn SquirrelStore>, StoreError>;
}

/// Provider configured from the `[storage]` config section
#[derive(Debug, Clone)]
pub struct BackendProvider {
    backend: StorageBackend,
    path: PathBuf,
}

impl BackendProvider {
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            backend: config.backend,
            path: PathBuf::from(&config.path),
        }
    }

    /// Prepare the backing medium once at start-up.
    ///
    /// The file backend creates an empty store if none exists; the SQL
    /// backend creates the `squirrels` table when `init_schema` is set.
    pub fn initialize(&self, init_schema: bool) -> Result<(), StoreError> {
        match self.backend {
            StorageBackend::File => FileStore::open(&self.path).map(|_| ()),
            StorageBackend::Sqlite => {
                let store = SqliteStore::open(&self.path)?;
                if init_schema {
                    store.ensure_schema()?;
                }
                Ok(())
            }
        }
    }
}

impl StoreProvider for BackendProvider {
    fn open(&self) -> Result<Box<dyn SquirrelStore>, StoreError> {
        match self.backend {
            StorageBackend::File => Ok(Box::new(FileStore::open(&self.path)?)),
            StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open(&self.path)?)),
        }
    }
}

/// Parse a path-segment id; anything that is not an integer cannot name a record
pub(crate) fn parse_id(id: &str) -> Result<SquirrelId, StoreError> {
    id.parse::<SquirrelId>()
        .map_err(|_| StoreError::NotFound(id.to_string()))
}
