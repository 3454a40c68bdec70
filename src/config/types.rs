use serde::Deserialize;

/// Main configuration structure for Site-Harvest
///
/// Every section is optional in the TOML file; missing sections and fields
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub harvest: HarvestConfig,
    pub output: OutputConfig,
}

/// How nested sitemap-index documents are followed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SitemapStrategy {
    /// Descend into the first nested sitemap only
    #[default]
    FirstNested,
    /// Resolve every nested sitemap and merge the results
    AllNested,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent fetches per depth level
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Longest chain of link hops followed from the seed
    #[serde(rename = "depth-limit")]
    pub depth_limit: u32,

    /// Honor robots.txt rules and crawl-delay pacing
    pub politeness: bool,

    /// Abort the session after this many seconds (0 = no deadline)
    #[serde(rename = "session-timeout-secs")]
    pub session_timeout_secs: u64,

    #[serde(rename = "sitemap-strategy")]
    pub sitemap_strategy: SitemapStrategy,

    /// Wildcard domain patterns links must match (empty = any domain)
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_workers: 5,
            depth_limit: 4,
            politeness: true,
            session_timeout_secs: 0,
            sitemap_strategy: SitemapStrategy::default(),
            allowed_domains: Vec::new(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Identity sent when crawling politely
    pub identity: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            identity: "JobHunterCrawler".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Extra attempts for transient failures (timeouts, connect errors, 5xx)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay between attempts; attempt `n` waits `n * retry_backoff_ms`
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            max_retries: 1,
            retry_backoff_ms: 250,
        }
    }
}

/// Categorization, extraction, and dedup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Category keywords, in claiming order
    pub categories: Vec<String>,

    #[serde(rename = "max-per-category")]
    pub max_per_category: usize,

    #[serde(rename = "extraction-workers")]
    pub extraction_workers: usize,

    /// Sentences repeated more than this many times are dropped
    #[serde(rename = "dedupe-threshold")]
    pub dedupe_threshold: usize,

    #[serde(rename = "asset-extensions")]
    pub asset_extensions: Vec<String>,

    #[serde(rename = "irrelevant-tags")]
    pub irrelevant_tags: Vec<String>,

    #[serde(rename = "advertisement-marker")]
    pub advertisement_marker: String,

    /// Blocks longer than this many characters are summarized (0 = never)
    #[serde(rename = "summary-threshold")]
    pub summary_threshold: usize,
}

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "about",
    "news",
    "team",
    "contact",
    "vacancie",
    "career",
    "event",
    "blog",
    "om oss",
    "nyheter",
    "kontakt",
    "stillinger",
    "karriere",
];

pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".css", ".js", ".mp4", ".mp3",
    ".avi", ".mov", ".webm", ".pdf", ".woff", ".woff2", ".ttf", ".xml",
];

pub const DEFAULT_IRRELEVANT_TAGS: &[&str] = &[
    "script", "style", "footer", "header", "nav", "aside", "form", "button", "svg",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            categories: owned(DEFAULT_CATEGORIES),
            max_per_category: 4,
            extraction_workers: 5,
            dedupe_threshold: 3,
            asset_extensions: owned(DEFAULT_ASSET_EXTENSIONS),
            irrelevant_tags: owned(DEFAULT_IRRELEVANT_TAGS),
            advertisement_marker: "advertis".to_string(),
            summary_threshold: 0,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path the newline-joined corpus is written to
    #[serde(rename = "corpus-path")]
    pub corpus_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            corpus_path: "./summary.txt".to_string(),
        }
    }
}
