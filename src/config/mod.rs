//! Configuration module for objcrawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use objcrawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler workers: {}", config.crawler.crawler_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, SeedEntry, StorageConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
