//! Crawler coordinator - pool orchestration
//!
//! The coordinator owns everything the two worker pools share:
//! - The frontier handle and the download queue
//! - The HTTP client and the robots.txt cache
//! - The extractor configured with the output folder and archive ceiling
//!
//! Shutdown order: crawler workers end on an empty frontier and each waits
//! on the queue's drain barrier; the queue is then closed so extraction
//! workers exit.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::worker::CrawlWorker;
use crate::download::{DownloadQueue, ExtractionWorker, Extractor};
use crate::robots::{RobotsCache, RobotsCacheStats};
use crate::seed::{seed_frontier, seeds_from_config, Seed};
use crate::storage::{open_storage, Frontier, SqliteStorage};
use crate::{ConfigError, CrawlError};
use reqwest::Client;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a finished crawl did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URLs popped from the frontier across all crawler workers
    pub pages_processed: usize,
    /// Model files written across all extraction workers
    pub models_extracted: usize,
    pub robots: RobotsCacheStats,
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    frontier: Frontier,
    client: Client,
    robots: Arc<RobotsCache>,
    queue: Arc<DownloadQueue>,
    extractor: Arc<Extractor>,
}

impl Coordinator {
    /// Creates a coordinator backed by the configured database file
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Storage opened, output folder present
    /// * `Err(CrawlError)` - Failed to initialize
    pub fn new(config: Config) -> crate::Result<Self> {
        let storage = open_storage(Path::new(&config.storage.database_path))?;
        Self::with_storage(config, storage)
    }

    /// Creates a coordinator around an already opened storage backend
    pub fn with_storage(config: Config, storage: SqliteStorage) -> crate::Result<Self> {
        fs::create_dir_all(&config.extraction.output_folder)?;

        let timeout = config.crawler.request_timeout_secs.map(Duration::from_secs);
        let client = build_http_client(&config.user_agent, timeout)?;

        let capacity = NonZeroUsize::new(config.crawler.robots_cache_capacity).ok_or_else(|| {
            ConfigError::Validation("robots-cache-capacity must be at least 1".to_string())
        })?;
        let robots = Arc::new(RobotsCache::new(client.clone(), capacity));

        let extractor = Arc::new(Extractor::new(
            &config.extraction.output_folder,
            config.extraction.max_archive_bytes,
        ));

        Ok(Self {
            config,
            frontier: Frontier::new(storage),
            client,
            robots,
            queue: Arc::new(DownloadQueue::new()),
            extractor,
        })
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    /// Feeds seeds into the frontier, returning how many were new
    pub fn seed(&self, seeds: &[Seed]) -> crate::Result<usize> {
        seed_frontier(&self.frontier, seeds)
    }

    /// Runs both worker pools until the frontier is exhausted and every
    /// queued download has been handled
    ///
    /// A crawler worker that fails on storage does not stop the others;
    /// its error is returned once the pools have shut down.
    pub async fn run(self) -> crate::Result<CrawlSummary> {
        let started = Instant::now();
        let crawler_workers = self.config.crawler.crawler_workers;
        let extraction_workers = self.config.crawler.extraction_workers;

        let waiting = self.frontier.count_unvisited()?;

        tracing::info!(
            "Starting crawl: {} URLs waiting, {} crawler and {} extraction workers",
            waiting,
            crawler_workers,
            extraction_workers
        );

        let extractors: Vec<_> = (0..extraction_workers)
            .map(|id| {
                let worker =
                    ExtractionWorker::new(id, Arc::clone(&self.queue), Arc::clone(&self.extractor));
                tokio::spawn(worker.run())
            })
            .collect();

        let crawlers: Vec<_> = (0..crawler_workers)
            .map(|id| {
                let worker = CrawlWorker::new(
                    id,
                    self.frontier.clone(),
                    self.client.clone(),
                    Arc::clone(&self.robots),
                    Arc::clone(&self.queue),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        let mut pages_processed = 0;
        let mut failure: Option<CrawlError> = None;
        for handle in crawlers {
            match handle.await {
                Ok(Ok(processed)) => pages_processed += processed,
                Ok(Err(e)) => {
                    tracing::error!("Crawler worker failed: {}", e);
                    failure = failure.or(Some(e));
                }
                Err(e) => {
                    tracing::error!("Crawler worker panicked: {}", e);
                    failure = failure.or(Some(CrawlError::WorkerPanicked(e)));
                }
            }
        }

        self.queue.close();

        let mut models_extracted = 0;
        for handle in extractors {
            models_extracted += handle.await?;
        }

        if let Some(e) = failure {
            return Err(e);
        }

        let summary = CrawlSummary {
            pages_processed,
            models_extracted,
            robots: self.robots.stats(),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl complete: {} URLs processed, {} model files extracted in {:.1}s",
            summary.pages_processed,
            summary.models_extracted,
            summary.elapsed.as_secs_f64()
        );
        tracing::info!(
            "robots.txt cache: {} hits, {} misses, {} origins",
            summary.robots.hits,
            summary.robots.misses,
            summary.robots.entries
        );

        Ok(summary)
    }
}

/// Opens the configured frontier, seeds it from the configuration and crawls
pub async fn run_crawl(config: Config) -> crate::Result<CrawlSummary> {
    let seeds = seeds_from_config(&config);
    let coordinator = Coordinator::new(config)?;
    coordinator.seed(&seeds)?;
    coordinator.run().await
}
