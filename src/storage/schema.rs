//! Database schema definitions
//!
//! The `urls` table is both the crawl frontier (rows with `visited = 0`)
//! and the permanent dedup index (every row ever inserted, keyed by the
//! URL fingerprint). Rows are never deleted.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    url_fingerprint BLOB NOT NULL UNIQUE,
    visited INTEGER NOT NULL DEFAULT 0,
    priority INTEGER NOT NULL,
    links_to INTEGER NOT NULL DEFAULT 1,
    discovered_at TEXT NOT NULL,
    visited_at TEXT
);

-- Serves the "next unvisited URL" scan
CREATE INDEX IF NOT EXISTS idx_urls_frontier ON urls(visited, priority, links_to DESC);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
