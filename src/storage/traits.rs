//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{Resource, ResourceKind};
use crate::storage::{ResourceRecord, RoadmapRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The pipeline only ever appends resources; reads are for the listing and
/// roadmap cache paths. Implementations must be `Send` so the persistence
/// worker can own one on a blocking thread.
pub trait Storage: Send {
    // ===== Resources =====

    /// Inserts resources, ignoring any already stored with the same URL and kind
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn save_resources(&mut self, resources: &[Resource]) -> StorageResult<usize>;

    /// Gets every stored resource, oldest first
    fn list_resources(&self) -> StorageResult<Vec<ResourceRecord>>;

    /// Counts stored resources of one kind
    fn count_resources_by_kind(&self, kind: ResourceKind) -> StorageResult<u64>;

    // ===== Roadmap Cache =====

    /// Gets the cached roadmap text for a topic
    fn get_roadmap(&self, topic: &str) -> StorageResult<Option<RoadmapRecord>>;

    /// Caches roadmap text for a topic, replacing any previous entry
    fn save_roadmap(&mut self, topic: &str, roadmap: &str) -> StorageResult<()>;
}
