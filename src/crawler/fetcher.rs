//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the crawler's user agent string
//! - GET requests whose body is left unread for the caller
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch was abandoned
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be turned into a request
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS, protocol or redirect failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server answered {0}")]
    Status(StatusCode),
}

/// Formats the user agent sent with every request
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy. Without `timeout` the
/// transport defaults apply.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Optional whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use objcrawler::config::UserAgentConfig;
/// use objcrawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "objcrawler".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/bot".to_string(),
///     contact_email: "bot@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, None).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent_string(config))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Sends a GET request and checks its status
///
/// Only the headers have been received when this returns; the body is
/// still open on the returned response.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(Response)` |
/// | other status | `FetchError::Status` |
/// | URL reqwest cannot send | `FetchError::InvalidUrl` |
/// | connection, TLS, redirect loop | `FetchError::Transport` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::Transport(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    Ok(response)
}

/// Returns the content-type header of a response, if present and readable
pub fn content_type_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
