//! Extraction worker loop

use crate::download::{DownloadQueue, ExtractError, Extractor};
use std::sync::Arc;

/// One member of the extraction pool
pub struct ExtractionWorker {
    id: usize,
    queue: Arc<DownloadQueue>,
    extractor: Arc<Extractor>,
}

impl ExtractionWorker {
    pub fn new(id: usize, queue: Arc<DownloadQueue>, extractor: Arc<Extractor>) -> Self {
        Self {
            id,
            queue,
            extractor,
        }
    }

    /// Processes tasks until the queue is closed and empty
    ///
    /// Every popped task is acknowledged, whether or not it produced files.
    /// Returns the number of model files this worker wrote.
    pub async fn run(self) -> usize {
        tracing::debug!("Extraction worker {} started", self.id);
        let mut written = 0;

        while let Some(task) = self.queue.pop().await {
            let url = task.url.clone();
            match self.extractor.extract(task).await {
                Ok(0) => {}
                Ok(count) => {
                    tracing::info!("Extracted {} model file(s) from {}", count, url);
                    written += count;
                }
                Err(e @ (ExtractError::MissingLength | ExtractError::TooLarge { .. })) => {
                    tracing::info!("Skipping archive {}: {}", url, e);
                }
                Err(e) => {
                    tracing::warn!("Failed to extract {}: {}", url, e);
                }
            }
            self.queue.task_done();
        }

        tracing::debug!("Extraction worker {} finished", self.id);
        written
    }
}
