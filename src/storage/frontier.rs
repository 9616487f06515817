//! Shared frontier handle
//!
//! Crawler workers share one storage backend behind a single coarse lock.
//! Each frontier operation holds the lock only for its own short database
//! critical section, never across a network fetch.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{EnqueueOutcome, SqliteStorage, UrlRecord};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, thread-safe handle to the frontier store
#[derive(Clone)]
pub struct Frontier {
    inner: Arc<Mutex<SqliteStorage>>,
}

impl Frontier {
    /// Wraps a storage backend so it can be shared between workers
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(storage)),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, SqliteStorage>> {
        self.inner.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Inserts `url` with `priority`, or increments its `links_to` if known
    pub fn enqueue_or_bump(&self, url: &str, priority: i64) -> StorageResult<EnqueueOutcome> {
        self.lock()?.enqueue_or_bump(url, priority)
    }

    /// Inserts or bumps a batch of URLs under one lock acquisition
    pub fn enqueue_all<'a, I>(&self, urls: I) -> StorageResult<usize>
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut storage = self.lock()?;
        let mut inserted = 0;
        for (url, priority) in urls {
            if storage.enqueue_or_bump(url, priority)? == EnqueueOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Claims the most urgent unvisited URL, marking it visited
    pub fn pop_next(&self) -> StorageResult<Option<String>> {
        self.lock()?.pop_next()
    }

    /// Gets the record for a URL, if it has ever been seen
    pub fn get_record(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        self.lock()?.get_record(url)
    }

    /// Counts URLs still waiting to be crawled
    pub fn count_unvisited(&self) -> StorageResult<u64> {
        self.lock()?.count_unvisited()
    }

    /// Counts every URL ever seen
    pub fn count_total(&self) -> StorageResult<u64> {
        self.lock()?.count_total()
    }
}
