//! Local cache: the whole roster serialized as one JSON blob under a fixed
//! key in a workspace SQLite database. The sidecar's stand-in for browser
//! localStorage; SQLite gives the single-key write atomicity the design
//! leans on.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::warn;

use crate::config;
use crate::model::Student;

pub fn open(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("roster.sqlite3");
    let conn = Connection::open(db_path)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cache(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}

/// Overwrite the cached roster. Synchronous; last write wins.
pub fn save(conn: &Connection, students: &[Student]) -> anyhow::Result<()> {
    let blob = serde_json::to_string(students)?;
    conn.execute(
        "INSERT INTO cache(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![config::CACHE_KEY, blob],
    )?;
    Ok(())
}

/// Read the cached roster back. A missing key or a payload that no longer
/// parses fails closed to `None` so the caller can fall back to the seed
/// set instead of surfacing an error.
pub fn load(conn: &Connection) -> Option<Vec<Student>> {
    let blob: String = conn
        .query_row(
            "SELECT value FROM cache WHERE key = ?1",
            [config::CACHE_KEY],
            |r| r.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            warn!(error = %e, "cache read failed");
            None
        })?;

    match serde_json::from_str(&blob) {
        Ok(students) => Some(students),
        Err(e) => {
            warn!(error = %e, "cached roster is corrupt, falling back to defaults");
            None
        }
    }
}
