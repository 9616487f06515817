use serde::Deserialize;

/// Main configuration structure for objcrawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
    pub extraction: ExtractionConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

/// Worker pool and fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent crawler workers
    #[serde(rename = "crawler-workers")]
    pub crawler_workers: usize,

    /// Number of concurrent extraction workers
    #[serde(rename = "extraction-workers")]
    pub extraction_workers: usize,

    /// Maximum number of origins whose robots.txt rules are kept in memory
    #[serde(rename = "robots-cache-capacity", default = "default_robots_cache_capacity")]
    pub robots_cache_capacity: usize,

    /// Overall request timeout in seconds; the transport default applies when unset
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_robots_cache_capacity() -> usize {
    1024
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Frontier persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Extraction sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Folder where extracted model files are written
    #[serde(rename = "output-folder")]
    pub output_folder: String,

    /// Archives whose content-length exceeds this are never opened
    #[serde(rename = "max-archive-bytes")]
    pub max_archive_bytes: u64,
}

/// A seed URL supplied through the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,

    /// Explicit priority; derived from the URL suffix when absent
    #[serde(default)]
    pub priority: Option<i64>,
}
