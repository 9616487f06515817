//! Saving model files out of downloaded resources
//!
//! Archives are spooled to an anonymous temp file and opened with the `zip`
//! crate on the blocking pool. Raw resources are sniffed for the Blender
//! header and streamed straight to the output folder.

use crate::download::{DownloadTask, ResourceKind};
use crate::url::{has_model_suffix, MODEL_SUFFIX};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use url::Url;
use zip::ZipArchive;

/// Signature at the start of every native Blender file
pub const BLENDER_MAGIC: &[u8] = b"BLENDER";

/// Reasons a download produced no output
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("archive has no content-length header")]
    MissingLength,

    #[error("archive is {size} bytes, ceiling is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("bad archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("download interrupted: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Writes model files from download tasks into one output folder
#[derive(Debug, Clone)]
pub struct Extractor {
    output_folder: PathBuf,
    max_archive_bytes: u64,
}

impl Extractor {
    pub fn new(output_folder: impl Into<PathBuf>, max_archive_bytes: u64) -> Self {
        Self {
            output_folder: output_folder.into(),
            max_archive_bytes,
        }
    }

    /// Handles one task according to its kind, returning the number of files written
    ///
    /// The task is consumed, so its response is closed whatever the outcome.
    pub async fn extract(&self, task: DownloadTask) -> Result<usize, ExtractError> {
        match task.kind {
            ResourceKind::Archive => self.extract_archive(task).await,
            ResourceKind::Raw => self.extract_raw(task).await,
            ResourceKind::Html | ResourceKind::Other => Ok(0),
        }
    }

    /// Extracts the model members of a zip archive
    ///
    /// The archive is rejected before any byte is read when its
    /// content-length is missing or above the ceiling. Extraction is not
    /// transactional: members written before a decode error stay on disk.
    pub async fn extract_archive(&self, task: DownloadTask) -> Result<usize, ExtractError> {
        let limit = self.max_archive_bytes;
        let size = task.content_length.ok_or(ExtractError::MissingLength)?;
        if size > limit {
            return Err(ExtractError::TooLarge { size, limit });
        }

        let mut response = task.response;
        let mut spool = tokio::fs::File::from_std(tempfile::tempfile()?);
        let mut received: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            received += chunk.len() as u64;
            if received > limit {
                return Err(ExtractError::TooLarge {
                    size: received,
                    limit,
                });
            }
            spool.write_all(&chunk).await?;
        }
        spool.flush().await?;
        drop(response);

        let spool = spool.into_std().await;
        let output = self.output_folder.clone();
        tokio::task::spawn_blocking(move || unpack_models(spool, &output)).await?
    }

    /// Saves a raw resource if it starts with the Blender signature
    ///
    /// Returns `Ok(0)` when the signature does not match.
    pub async fn extract_raw(&self, task: DownloadTask) -> Result<usize, ExtractError> {
        let DownloadTask {
            url, mut response, ..
        } = task;

        let mut head = Vec::with_capacity(BLENDER_MAGIC.len());
        while head.len() < BLENDER_MAGIC.len() {
            match response.chunk().await? {
                Some(chunk) => head.extend_from_slice(&chunk),
                None => break,
            }
        }

        if !head.starts_with(BLENDER_MAGIC) {
            tracing::debug!("{} is not a Blender file", url);
            return Ok(0);
        }

        let path = self.output_folder.join(model_file_name(&url));
        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(&head).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!("Saved {} to {}", url, path.display());
        Ok(1)
    }
}

/// Builds the output name for a raw model file
///
/// The last path segment up to its first dot, followed by the hex SHA-256
/// of the whole URL, so two URLs sharing a basename never collide.
///
/// # Examples
///
/// ```
/// use objcrawler::download::model_file_name;
/// use url::Url;
///
/// let name = model_file_name(&Url::parse("http://test.com/files/chair.v2.blend").unwrap());
/// assert!(name.starts_with("chair"));
/// assert!(name.ends_with(".blend"));
/// ```
pub fn model_file_name(url: &Url) -> String {
    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let stem = basename.split('.').next().unwrap_or_default();
    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));

    format!("{}{}{}", stem, digest, MODEL_SUFFIX)
}

/// Copies every model member of an archive under `output`
///
/// The member list is filtered by name before anything is opened, so other
/// members are never decoded. Members whose names would escape `output` are
/// skipped.
fn unpack_models<R: Read + Seek>(reader: R, output: &Path) -> Result<usize, ExtractError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut models: Vec<String> = archive
        .file_names()
        .filter(|name| has_model_suffix(name))
        .map(str::to_owned)
        .collect();
    models.sort();

    let mut written = 0;
    for name in models {
        let mut member = archive.by_name(&name)?;
        if member.is_dir() {
            continue;
        }

        let Some(relative) = member.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!("Skipping unsafe archive member name {:?}", member.name());
            continue;
        };

        let destination = output.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&destination)?;
        io::copy(&mut member, &mut file)?;
        written += 1;
    }

    Ok(written)
}
