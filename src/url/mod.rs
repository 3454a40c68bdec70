//! URL handling module for Site-Harvest
//!
//! This module provides URL normalization, domain extraction, wildcard matching,
//! and the inclusion predicates that decide which discovered links are followed.

mod domain;
mod matcher;
mod normalize;

use crate::config::Config;
use std::borrow::Cow;

// Re-export main functions
pub use domain::{domain_key, extract_domain, robots_url};
pub use matcher::{matches_any, matches_wildcard};
pub use normalize::{normalize_url, resolve_and_normalize};

/// Percent-decodes a URL for keyword matching
///
/// Normalized URLs carry `%20` where the link had a space, so a keyword like
/// `"om oss"` only matches the decoded form. Undecodable input is returned as is.
pub fn decode_for_matching(url: &str) -> Cow<'_, str> {
    urlencoding::decode(url).unwrap_or(Cow::Borrowed(url))
}

/// Decides whether a discovered URL is worth following
///
/// Implemented for plain closures, so `&|url: &str| url.contains("jobs")`
/// works anywhere a filter is expected.
pub trait LinkFilter: Send + Sync {
    fn includes(&self, url: &str) -> bool;
}

impl<F> LinkFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn includes(&self, url: &str) -> bool {
        self(url)
    }
}

/// Filter that accepts every URL
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl LinkFilter for AllowAll {
    fn includes(&self, _url: &str) -> bool {
        true
    }
}

/// Keyword/domain filter used for harvesting
///
/// A URL passes when its lowercased form contains any keyword and its host
/// matches one of the allowed domain patterns (or no patterns are set).
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    allowed_domains: Vec<String>,
}

impl KeywordFilter {
    pub fn new(keywords: &[String], allowed_domains: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            allowed_domains: allowed_domains.to_vec(),
        }
    }

    /// Builds the filter from the configured harvest categories and domains
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.harvest.categories, &config.crawler.allowed_domains)
    }
}

impl LinkFilter for KeywordFilter {
    fn includes(&self, url: &str) -> bool {
        let lowered = decode_for_matching(url).to_lowercase();
        if !self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return false;
        }

        if self.allowed_domains.is_empty() {
            return true;
        }

        ::url::Url::parse(url)
            .ok()
            .and_then(|u| extract_domain(&u))
            .is_some_and(|host| matches_any(&self.allowed_domains, &host))
    }
}
