//! Storage module for persisting resources and cached roadmaps
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent resource inserts
//! - The per-topic roadmap cache
//! - The background persistence queue used by the pipeline

mod schema;
mod sqlite;
mod traits;
mod writer;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use writer::{PersistenceQueue, PersistenceWorker};

use crate::model::ResourceKind;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A resource row as read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub kind: ResourceKind,
    pub source: String,
    pub created_at: String,
}

/// A cached roadmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapRecord {
    pub topic: String,
    pub roadmap: String,
    pub created_at: String,
}
