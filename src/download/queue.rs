//! Unbounded FIFO between the crawler pool and the extraction pool
//!
//! Every pushed item must be acknowledged with [`DownloadQueue::task_done`]
//! once it has been fully handled; [`DownloadQueue::join`] waits until the
//! number of unacknowledged items drops to zero.

use crate::download::DownloadTask;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex as AsyncMutex};

/// Returned by [`DownloadQueue::push`] after the queue was closed
#[derive(Debug, Error)]
#[error("download queue is closed")]
pub struct QueueClosed<T>(pub T);

/// Multi-producer, multi-consumer work queue with a drain barrier
pub struct DownloadQueue<T = DownloadTask> {
    sender: Mutex<Option<mpsc::UnboundedSender<T>>>,
    receiver: AsyncMutex<mpsc::UnboundedReceiver<T>>,
    pending: watch::Sender<usize>,
}

impl<T> DownloadQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (pending, _) = watch::channel(0);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: AsyncMutex::new(receiver),
            pending,
        }
    }

    /// Appends an item; never blocks
    pub fn push(&self, item: T) -> Result<(), QueueClosed<T>> {
        let guard = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let Some(sender) = guard.as_ref() else {
            return Err(QueueClosed(item));
        };

        self.pending.send_modify(|n| *n += 1);
        sender.send(item).map_err(|e| {
            self.pending.send_modify(|n| *n -= 1);
            QueueClosed(e.0)
        })
    }

    /// Takes the oldest item, waiting while the queue is empty
    ///
    /// Returns `None` once the queue has been closed and drained.
    pub async fn pop(&self) -> Option<T> {
        self.receiver.lock().await.recv().await
    }

    /// Acknowledges one popped item as fully processed
    pub fn task_done(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Waits until every pushed item has been acknowledged
    pub async fn join(&self) {
        let mut pending = self.pending.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    /// Stops accepting items; consumers exit after draining what is left
    pub fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }

    /// Number of items pushed but not yet acknowledged
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }
}

impl<T> Default for DownloadQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
