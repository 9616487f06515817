//! Storage module for the crawl frontier
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - The unified frontier/dedup table of URL records
//! - Atomic insert-or-bump and pop-and-mark operations
//! - A lock-guarded handle shared by crawler workers

mod frontier;
mod schema;
mod sqlite;
mod traits;

pub use frontier::Frontier;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use sha2::{Digest, Sha256};
use std::path::Path;

/// Width in bytes of a URL fingerprint
pub const FINGERPRINT_LEN: usize = 32;

/// Computes the dedup fingerprint of a URL: SHA-256 of its UTF-8 bytes
pub fn fingerprint(url: &str) -> [u8; FINGERPRINT_LEN] {
    Sha256::digest(url.as_bytes()).into()
}

/// Initializes or opens a frontier database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a URL in the frontier table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub url_fingerprint: Vec<u8>,
    pub visited: bool,
    pub priority: i64,
    pub links_to: i64,
    pub discovered_at: String,
    pub visited_at: Option<String>,
}

/// What `enqueue_or_bump` did with a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The URL was new and is now waiting in the frontier
    Inserted,
    /// The URL was already known; its `links_to` is now the contained value
    Bumped(i64),
}
