//! Embedded database layer
//!
//! All persistent state lives in a single redb file shared by the order,
//! directory and session stores. Each store declares its own tables and
//! initializes them when constructed; this module only opens the database.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a commit is
//! persistent as soon as `commit()` returns, and the file is always in a
//! consistent state after power loss.

use redb::Database;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Storage errors shared by all stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Open or create the database file at the given path
pub fn open(path: impl AsRef<Path>) -> StorageResult<Arc<Database>> {
    let db = Database::create(path)?;
    Ok(Arc::new(db))
}

/// Open an in-memory database (for testing)
pub fn open_in_memory() -> StorageResult<Arc<Database>> {
    let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
    Ok(Arc::new(db))
}
