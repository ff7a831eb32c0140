//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{Resource, ResourceKind};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ResourceRecord, RoadmapRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Resources =====

    /// `created_at` records when the provider fetched the resource
    fn save_resources(&mut self, resources: &[Resource]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO resources (title, url, kind, source, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for resource in resources {
                inserted += stmt.execute(params![
                    resource.title(),
                    resource.url().as_str(),
                    resource.kind().to_db_string(),
                    resource.source(),
                    resource.fetched_at().to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn list_resources(&self) -> StorageResult<Vec<ResourceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, url, kind, source, created_at FROM resources ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, title, url, kind, source, created_at) = row?;
            let kind = ResourceKind::from_db_string(&kind).ok_or_else(|| {
                StorageError::Database(format!("Unknown resource kind '{}' in row {}", kind, id))
            })?;
            records.push(ResourceRecord {
                id,
                title,
                url,
                kind,
                source,
                created_at,
            });
        }

        Ok(records)
    }

    fn count_resources_by_kind(&self, kind: ResourceKind) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM resources WHERE kind = ?1",
            params![kind.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Roadmap Cache =====

    fn get_roadmap(&self, topic: &str) -> StorageResult<Option<RoadmapRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT topic, roadmap, created_at FROM roadmaps WHERE topic = ?1",
                params![topic],
                |row| {
                    Ok(RoadmapRecord {
                        topic: row.get(0)?,
                        roadmap: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn save_roadmap(&mut self, topic: &str, roadmap: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO roadmaps (topic, roadmap, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(topic) DO UPDATE SET roadmap = excluded.roadmap, created_at = excluded.created_at",
            params![topic, roadmap, now],
        )?;
        Ok(())
    }
}
