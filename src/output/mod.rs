//! Output module for reporting crawl progress
//!
//! This module handles:
//! - Loading frontier statistics from the database
//! - Printing statistics and crawl summaries

pub mod stats;

pub use stats::{
    load_statistics, print_crawl_summary, print_statistics, FrontierStatistics, MOST_LINKED_LIMIT,
};
