//! Robots.txt caching implementation
//!
//! One entry per origin, kept in an LRU with a fixed capacity. Entries never
//! expire: an origin whose robots.txt could not be fetched stays "allow all"
//! for the rest of the process.

use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::origin_of;
use lru::LruCache;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

/// User agent the crawler evaluates robots.txt rules for
pub const ROBOTS_USER_AGENT: &str = "*";

/// Memoized robots.txt outcome for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsEntry {
    /// robots.txt was fetched (or its status mapped to a rule set)
    Rules(ParsedRobots),
    /// robots.txt could not be fetched; everything is allowed
    Unavailable,
}

impl RobotsEntry {
    /// Checks whether `url` may be fetched under this entry
    pub fn allows(&self, url: &str) -> bool {
        match self {
            Self::Rules(robots) => robots.is_allowed(url, ROBOTS_USER_AGENT),
            Self::Unavailable => true,
        }
    }
}

/// Snapshot of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RobotsCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Shared, LRU-bounded memo of robots.txt rules keyed by origin
///
/// The entry map is locked only for lookups and inserts; fetches run without
/// the lock, so lookups for different origins never wait on each other's
/// network I/O. Two workers that miss the same origin at the same time may
/// both fetch it; the later insert wins and both count as misses.
pub struct RobotsCache {
    client: Client,
    entries: Mutex<LruCache<String, Arc<RobotsEntry>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RobotsCache {
    /// Creates an empty cache holding at most `capacity` origins
    pub fn new(client: Client, capacity: NonZeroUsize) -> Self {
        Self {
            client,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // The map holds no invariants a panicking holder could break.
    fn entries(&self) -> MutexGuard<'_, LruCache<String, Arc<RobotsEntry>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Tells whether robots.txt of the URL's origin allows fetching it
    pub async fn can_fetch(&self, url: &Url) -> bool {
        let Some(origin) = origin_of(url) else {
            return true;
        };

        let entry = self.get_rules_for_origin(&origin).await;
        entry.allows(url.as_str())
    }

    /// Returns the memoized entry for `origin`, fetching it on a miss
    pub async fn get_rules_for_origin(&self, origin: &str) -> Arc<RobotsEntry> {
        let cached = self.entries().get(origin).cloned();
        if let Some(entry) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("robots.txt cache hit for {}", origin);
            return entry;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Fetching robots.txt for {}", origin);

        let entry = match fetch_robots(&self.client, origin).await {
            Ok(robots) => RobotsEntry::Rules(robots),
            Err(e) => {
                tracing::warn!("Error getting robots.txt for {} ({})", origin, e);
                RobotsEntry::Unavailable
            }
        };

        let entry = Arc::new(entry);
        self.entries().put(origin.to_string(), Arc::clone(&entry));
        entry
    }

    /// Number of lookups answered from memory
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that required a fetch
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of the counters and the current number of entries
    pub fn stats(&self) -> RobotsCacheStats {
        RobotsCacheStats {
            hits: self.hits(),
            misses: self.misses(),
            entries: self.entries().len(),
        }
    }
}
