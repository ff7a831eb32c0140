//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Roadmap-Scout database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Resources gathered by the pipeline
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('text', 'video')),
    source TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(url, kind)
);

CREATE INDEX IF NOT EXISTS idx_resources_kind ON resources(kind);

-- Cached roadmap text, one per topic
CREATE TABLE IF NOT EXISTS roadmaps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic TEXT NOT NULL UNIQUE,
    roadmap TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
