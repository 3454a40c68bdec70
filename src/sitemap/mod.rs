//! Sitemap resolution
//!
//! Turns a sitemap URL into a flat list of candidate page URLs, following
//! sitemap-index indirection. By default only the first nested sitemap of an
//! index is followed (single-path descent); `SitemapStrategy::AllNested`
//! follows every nested sitemap and merges the results.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::config::SitemapStrategy;
use crate::crawler::HttpFetcher;
use std::collections::HashSet;

/// Maximum sitemap-index nesting followed before giving up
pub const MAX_SITEMAP_DEPTH: usize = 10;

/// Resolves sitemap URLs into page URLs
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    fetcher: HttpFetcher,
    user_agent: String,
    strategy: SitemapStrategy,
}

impl SitemapResolver {
    pub fn new(fetcher: HttpFetcher, user_agent: impl Into<String>, strategy: SitemapStrategy) -> Self {
        Self {
            fetcher,
            user_agent: user_agent.into(),
            strategy,
        }
    }

    /// Resolves a sitemap URL into the page URLs it lists
    ///
    /// # Returns
    ///
    /// * `Some(urls)` - A non-empty list of page URLs in document order
    /// * `None` - The sitemap is unusable (fetch failure, malformed or empty
    ///   XML, or nesting deeper than [`MAX_SITEMAP_DEPTH`])
    pub async fn resolve(&self, sitemap_url: &str) -> Option<Vec<String>> {
        let mut pending = vec![(sitemap_url.to_string(), 0usize)];
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        while let Some((current, depth)) = pending.pop() {
            if depth > MAX_SITEMAP_DEPTH {
                tracing::warn!("Sitemap nesting exceeds {} at {}", MAX_SITEMAP_DEPTH, current);
                continue;
            }
            if !seen.insert(current.clone()) {
                continue;
            }

            let page = match self.fetcher.fetch(&current, &self.user_agent).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::info!("Sitemap {} unavailable: {}", current, e);
                    continue;
                }
            };

            match parse_sitemap(&page.body) {
                Some(SitemapDocument::UrlSet(found)) => {
                    tracing::debug!("Sitemap {} lists {} URLs", current, found.len());
                    urls.extend(found);
                }
                Some(SitemapDocument::Index(nested)) => {
                    let followed: Vec<String> = match self.strategy {
                        SitemapStrategy::FirstNested => nested.into_iter().take(1).collect(),
                        SitemapStrategy::AllNested => nested,
                    };
                    // Reversed so the stack pops them in document order
                    pending.extend(followed.into_iter().rev().map(|u| (u, depth + 1)));
                }
                None => tracing::info!("Sitemap {} is empty or malformed", current),
            }
        }

        if urls.is_empty() {
            None
        } else {
            Some(urls)
        }
    }
}
