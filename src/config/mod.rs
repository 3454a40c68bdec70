//! Configuration module for Site-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will follow links {} hops deep", config.crawler.depth_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HarvestConfig, HttpConfig, OutputConfig, SitemapStrategy,
    UserAgentConfig, DEFAULT_ASSET_EXTENSIONS, DEFAULT_CATEGORIES, DEFAULT_IRRELEVANT_TAGS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
