//! Download handling module
//!
//! Crawler workers push archives and raw files onto the [`DownloadQueue`];
//! extraction workers pop them and write model files to disk.

mod extractor;
mod queue;
mod task;
mod worker;

pub use extractor::{model_file_name, ExtractError, Extractor, BLENDER_MAGIC};
pub use queue::{DownloadQueue, QueueClosed};
pub use task::{DownloadTask, ResourceKind};
pub use worker::ExtractionWorker;
