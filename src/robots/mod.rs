//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Rules are evaluated for the wildcard user agent.

mod cache;
mod parser;

pub use cache::{RobotsCache, RobotsCacheStats, RobotsEntry, ROBOTS_USER_AGENT};
pub use parser::ParsedRobots;

use reqwest::{Client, StatusCode};

/// Fetches robots.txt for an origin
///
/// Status handling follows the classic robots parser: 401 and 403 forbid
/// the whole origin, any other non-success status allows it.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - Scheme and host, e.g. `http://test.com`
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - The rules that apply to the origin
/// * `Err(reqwest::Error)` - The request or body read failed
pub async fn fetch_robots(client: &Client, origin: &str) -> Result<ParsedRobots, reqwest::Error> {
    let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));
    let response = client.get(&robots_url).send().await?;

    let status = response.status();
    if status.is_success() {
        let body = response.text().await?;
        Ok(ParsedRobots::from_content(&body))
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Ok(ParsedRobots::disallow_all())
    } else {
        Ok(ParsedRobots::allow_all())
    }
}
