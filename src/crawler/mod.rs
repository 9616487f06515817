//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link extraction
//! - The crawler worker loop
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod worker;

pub use coordinator::{run_crawl, Coordinator, CrawlSummary};
pub use fetcher::{build_http_client, content_type_of, fetch_url, user_agent_string, FetchError};
pub use parser::parse_links;
pub use worker::CrawlWorker;
