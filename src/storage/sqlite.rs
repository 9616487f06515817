//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{fingerprint, EnqueueOutcome, UrlRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

const RECORD_COLUMNS: &str =
    "id, url, url_fingerprint, visited, priority, links_to, discovered_at, visited_at";

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
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing and dry runs)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<UrlRecord> {
        Ok(UrlRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            url_fingerprint: row.get(2)?,
            visited: row.get(3)?,
            priority: row.get(4)?,
            links_to: row.get(5)?,
            discovered_at: row.get(6)?,
            visited_at: row.get(7)?,
        })
    }

    fn count_where(&self, condition: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM urls WHERE {}", condition),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    // ===== Frontier Mutation =====

    fn enqueue_or_bump(&mut self, url: &str, priority: i64) -> StorageResult<EnqueueOutcome> {
        let now = Utc::now().to_rfc3339();
        let fp = fingerprint(url);

        // Insert-or-bump is one statement and therefore atomic per fingerprint
        let links_to: i64 = self.conn.query_row(
            "INSERT INTO urls (url, url_fingerprint, visited, priority, links_to, discovered_at)
             VALUES (?1, ?2, 0, ?3, 1, ?4)
             ON CONFLICT(url_fingerprint) DO UPDATE SET links_to = links_to + 1
             RETURNING links_to",
            params![url, &fp[..], priority, now],
            |row| row.get(0),
        )?;

        if links_to == 1 {
            Ok(EnqueueOutcome::Inserted)
        } else {
            Ok(EnqueueOutcome::Bumped(links_to))
        }
    }

    fn pop_next(&mut self) -> StorageResult<Option<String>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let next: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, url FROM urls WHERE visited = 0
                 ORDER BY priority ASC, links_to DESC, id ASC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((id, _)) = &next {
            let now = Utc::now().to_rfc3339();
            tx.execute(
                "UPDATE urls SET visited = 1, visited_at = ?1 WHERE id = ?2 AND visited = 0",
                params![now, id],
            )?;
        }

        tx.commit()?;
        Ok(next.map(|(_, url)| url))
    }

    // ===== Queries =====

    fn get_record(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let fp = fingerprint(url);
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM urls WHERE url_fingerprint = ?1",
                    RECORD_COLUMNS
                ),
                params![&fp[..]],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn count_total(&self) -> StorageResult<u64> {
        self.count_where("1 = 1")
    }

    fn count_visited(&self) -> StorageResult<u64> {
        self.count_where("visited = 1")
    }

    fn count_unvisited(&self) -> StorageResult<u64> {
        self.count_where("visited = 0")
    }

    fn most_linked(&self, limit: usize) -> StorageResult<Vec<UrlRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM urls ORDER BY links_to DESC, id ASC LIMIT ?1",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![limit as i64], Self::record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
