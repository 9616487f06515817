//! Statistics generation from the frontier database
//!
//! This module provides functionality for extracting and displaying
//! frontier statistics from the storage layer.

use crate::crawler::CrawlSummary;
use crate::storage::{Storage, UrlRecord};

/// How many of the most referenced URLs are reported
pub const MOST_LINKED_LIMIT: usize = 10;

/// Frontier statistics summary
#[derive(Debug, Clone)]
pub struct FrontierStatistics {
    /// Every URL ever discovered
    pub total: u64,

    /// URLs already popped by a crawler worker
    pub visited: u64,

    /// URLs still waiting in the frontier
    pub unvisited: u64,

    /// The most referenced URLs, highest `links_to` first
    pub most_linked: Vec<UrlRecord>,
}

impl FrontierStatistics {
    /// Share of discovered URLs already visited, in percent
    pub fn visited_percentage(&self) -> f64 {
        if self.total > 0 {
            (self.visited as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(FrontierStatistics)` - Successfully loaded statistics
/// * `Err(CrawlError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> crate::Result<FrontierStatistics> {
    Ok(FrontierStatistics {
        total: storage.count_total()?,
        visited: storage.count_visited()?,
        unvisited: storage.count_unvisited()?,
        most_linked: storage.most_linked(MOST_LINKED_LIMIT)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &FrontierStatistics) {
    println!("=== Frontier Statistics ===\n");

    println!("Overview:");
    println!("  Total URLs discovered: {}", stats.total);
    println!(
        "  Visited: {} ({:.1}%)",
        stats.visited,
        stats.visited_percentage()
    );
    println!("  Waiting: {}", stats.unvisited);
    println!();

    if !stats.most_linked.is_empty() {
        println!("Most Linked URLs:");
        for record in &stats.most_linked {
            let marker = if record.visited { "visited" } else { "waiting" };
            println!(
                "  {:>6}  p{}  {:<7}  {}",
                record.links_to, record.priority, marker, record.url
            );
        }
        println!();
    }
}

/// Prints the outcome of a crawl to stdout
pub fn print_crawl_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("  URLs processed: {}", summary.pages_processed);
    println!("  Model files extracted: {}", summary.models_extracted);
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!(
        "  robots.txt cache: {} hits / {} misses ({} origins cached)",
        summary.robots.hits, summary.robots.misses, summary.robots.entries
    );
}
