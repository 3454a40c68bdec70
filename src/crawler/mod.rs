//! Crawler module for URL discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retry
//! - HTML parsing and link extraction
//! - The shared visited set and session abort guard
//! - Sitemap-first, link-crawl-fallback coordination

mod coordinator;
mod fetcher;
mod parser;
mod session;

pub use coordinator::{CrawlOutcome, CrawlSource, Crawler};
pub use fetcher::{
    build_http_client, random_user_agent, FetchError, FetchResult, FetchedPage, HttpFetcher,
};
pub use parser::{parse_html, ParsedPage};
pub use session::{SessionGuard, VisitedSet};

use crate::config::Config;
use crate::url::LinkFilter;
use crate::HarvestError;
use std::sync::Arc;
use url::Url;

/// Runs a complete crawl session from a seed URL
///
/// Builds the HTTP client from `config`, then discovers URLs the way
/// [`Crawler::start`] does.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::Config;
/// use site_harvest::crawler::crawl;
/// use site_harvest::url::KeywordFilter;
/// use std::sync::Arc;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let seed = Url::parse("https://www.kongsberg.com/")?;
/// let outcome = crawl(&config, &seed, Arc::new(KeywordFilter::from_config(&config))).await?;
/// println!("{} URLs via {:?}", outcome.urls.len(), outcome.source);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    seed: &Url,
    filter: Arc<dyn LinkFilter>,
) -> Result<CrawlOutcome, HarvestError> {
    let fetcher = HttpFetcher::from_config(config)?;
    let guard = SessionGuard::from_timeout_secs(config.crawler.session_timeout_secs);
    Crawler::new(config, fetcher, guard).start(seed, filter).await
}
