//! Download tasks handed from crawler workers to extraction workers

use reqwest::header::CONTENT_LENGTH;
use reqwest::Response;
use url::Url;

/// What a fetched resource is, judged by its content-type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `text/html`: harvest links
    Html,
    /// `application/zip`: open as an archive
    Archive,
    /// `text/plain`: sniff for a raw model file
    Raw,
    /// Anything else is discarded
    Other,
}

impl ResourceKind {
    /// Classifies a content-type header value by its prefix
    ///
    /// # Examples
    ///
    /// ```
    /// use objcrawler::download::ResourceKind;
    ///
    /// assert_eq!(ResourceKind::classify("text/html; charset=utf-8"), ResourceKind::Html);
    /// assert_eq!(ResourceKind::classify("image/png"), ResourceKind::Other);
    /// ```
    pub fn classify(content_type: &str) -> Self {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("text/html") {
            Self::Html
        } else if content_type.starts_with("application/zip") {
            Self::Archive
        } else if content_type.starts_with("text/plain") {
            Self::Raw
        } else {
            Self::Other
        }
    }
}

/// An open response waiting for an extraction worker
///
/// The body has not been read yet. Dropping the task closes the underlying
/// connection, so every exit path of an extraction releases it.
#[derive(Debug)]
pub struct DownloadTask {
    pub url: Url,
    pub kind: ResourceKind,
    pub content_type: String,
    /// Value of the content-length header as sent by the server
    pub content_length: Option<u64>,
    pub response: Response,
}

impl DownloadTask {
    /// Wraps a response whose content-type has already been read
    pub fn new(url: Url, content_type: String, response: Response) -> Self {
        // Read the header directly: `Response::content_length` reports None
        // for bodies reqwest will decompress.
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            kind: ResourceKind::classify(&content_type),
            url,
            content_type,
            content_length,
            response,
        }
    }
}
