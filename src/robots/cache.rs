//! Per-session robots.txt cache
//!
//! Records live for the whole harvest session and never expire. Each domain
//! gets its own once-cell, so concurrent first lookups share one fetch.

use crate::crawler::HttpFetcher;
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::domain_key;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Longest crawl delay honored; larger advertised values are clamped
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

type RobotsSlot = Arc<OnceCell<Option<Arc<ParsedRobots>>>>;

/// Session-scoped robots.txt cache keyed by domain
pub struct RobotsCache {
    fetcher: HttpFetcher,
    user_agent: String,
    records: Mutex<HashMap<String, RobotsSlot>>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The HTTP fetcher used for robots.txt requests
    /// * `user_agent` - Identity sent with robots.txt requests and used for rule lookups
    pub fn new(fetcher: HttpFetcher, user_agent: impl Into<String>) -> Self {
        Self {
            fetcher,
            user_agent: user_agent.into(),
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolves the robots record for the URL's domain, fetching on first use
    ///
    /// `None` means robots.txt is unavailable; callers treat that as
    /// "no restrictions known". Unavailability is cached like a record.
    pub async fn resolve(&self, url: &Url) -> Option<Arc<ParsedRobots>> {
        let key = domain_key(url)?;

        let slot = {
            let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(records.entry(key).or_default())
        };

        slot.get_or_init(|| async {
            fetch_robots(&self.fetcher, url, &self.user_agent)
                .await
                .map(Arc::new)
        })
        .await
        .clone()
    }

    /// True unless the domain's robots.txt explicitly denies the URL
    pub async fn is_allowed(&self, url: &Url) -> bool {
        match self.resolve(url).await {
            Some(robots) => robots.is_allowed(url.as_str(), &self.user_agent),
            None => true,
        }
    }

    /// Crawl delay advertised for this cache's user agent, if any
    ///
    /// Values above [`MAX_CRAWL_DELAY`] are clamped to it.
    pub async fn crawl_delay(&self, url: &Url) -> Option<Duration> {
        let robots = self.resolve(url).await?;
        robots.crawl_delay(&self.user_agent).and_then(delay_from_secs)
    }

    /// Sitemap URLs advertised for the URL's domain
    pub async fn sitemaps(&self, url: &Url) -> Vec<String> {
        self.resolve(url)
            .await
            .map(|robots| robots.sitemaps().to_vec())
            .unwrap_or_default()
    }

    /// Number of domains looked up so far (available or not)
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn delay_from_secs(secs: f64) -> Option<Duration> {
    if secs <= 0.0 {
        return None;
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(delay) if delay <= MAX_CRAWL_DELAY => Some(delay),
        _ => {
            tracing::debug!("Crawl-delay of {}s exceeds the cap, using {:?}", secs, MAX_CRAWL_DELAY);
            Some(MAX_CRAWL_DELAY)
        }
    }
}
