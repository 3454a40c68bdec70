//! Site-Harvest: a polite company-site content harvester
//!
//! This crate discovers the about/news/careers/contact pages of a website,
//! respecting robots.txt and preferring sitemap-driven discovery, then extracts
//! boilerplate-free text from them grouped by keyword category.

pub mod config;
pub mod crawler;
pub mod harvest;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Harvest operations
///
/// Only errors at the session boundary surface here. Per-URL failures below it
/// are absorbed and logged by the crawler and the extraction pipeline.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Seed URL {url} is unreachable: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlSource, Crawler};
pub use harvest::{HarvestReport, Harvester};
pub use url::{extract_domain, normalize_url, KeywordFilter, LinkFilter};
