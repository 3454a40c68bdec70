//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! A robots.txt that cannot be fetched or read is "unavailable", which callers
//! interpret as permission to crawl.

mod cache;
mod parser;

pub use cache::{RobotsCache, MAX_CRAWL_DELAY};
pub use parser::ParsedRobots;

use crate::crawler::HttpFetcher;
use crate::url::robots_url;
use url::Url;

/// Fetches and parses robots.txt for the site a URL belongs to
///
/// # Arguments
///
/// * `fetcher` - The HTTP fetcher to use
/// * `site` - Any URL on the site
/// * `user_agent` - The user agent string to send
///
/// # Returns
///
/// * `Some(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `None` - robots.txt is missing, returned an error status, or failed to load
pub async fn fetch_robots(fetcher: &HttpFetcher, site: &Url, user_agent: &str) -> Option<ParsedRobots> {
    let robots_url = robots_url(site)?;

    match fetcher.fetch(robots_url.as_str(), user_agent).await {
        Ok(page) => {
            tracing::debug!("Fetched robots.txt from {}", robots_url);
            Some(ParsedRobots::from_content(&page.body))
        }
        Err(e) => {
            tracing::debug!("robots.txt unavailable at {}: {}", robots_url, e);
            None
        }
    }
}
