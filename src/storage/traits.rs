//! Storage traits and error types
//!
//! This module defines the trait interface for frontier storage backends and
//! associated error types.

use crate::storage::{EnqueueOutcome, UrlRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontier lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for frontier storage backends
///
/// A backend is simultaneously the priority queue of unvisited URLs and the
/// dedup index of every URL ever seen. Mutating operations take `&mut self`;
/// callers that share a backend between workers wrap it in a lock (see
/// [`crate::storage::Frontier`]).
pub trait Storage {
    // ===== Frontier Mutation =====

    /// Inserts a new unvisited URL, or bumps `links_to` if it is already known
    ///
    /// The priority of an existing record is never changed.
    fn enqueue_or_bump(&mut self, url: &str, priority: i64) -> StorageResult<EnqueueOutcome>;

    /// Marks the most urgent unvisited URL as visited and returns it
    ///
    /// Urgency is ascending `priority`, then descending `links_to`.
    /// Returns `None` when no unvisited URL exists.
    fn pop_next(&mut self) -> StorageResult<Option<String>>;

    // ===== Queries =====

    /// Gets the record for a URL, if it has ever been seen
    fn get_record(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Counts every URL ever seen
    fn count_total(&self) -> StorageResult<u64>;

    /// Counts URLs that have been popped
    fn count_visited(&self) -> StorageResult<u64>;

    /// Counts URLs still waiting in the frontier
    fn count_unvisited(&self) -> StorageResult<u64>;

    /// Gets the records with the highest `links_to` counts
    fn most_linked(&self, limit: usize) -> StorageResult<Vec<UrlRecord>>;
}
