//! End-to-end harvest sessions
//!
//! A session fetches the seed page, discovers URLs with the [`Crawler`],
//! buckets them by keyword, extracts text from every bucketed page, and
//! filters repeated sentences out of the resulting corpus.

mod categorize;
mod dedup;
mod extract;
mod pipeline;
mod summarize;

pub use categorize::{categorize, categorize_by_length, is_ignored_asset, CategoryMap};
pub use dedup::{dedupe_blocks, remove_repeated_sentences, split_sentences};
pub use extract::{BoilerplateStripper, ContentHandler, ExtractionError};
pub use pipeline::{ExtractionPipeline, PageOutcome, PipelineResult};
pub use summarize::{LeadSummarizer, Summarizer};

use crate::config::Config;
use crate::crawler::{random_user_agent, CrawlSource, Crawler, HttpFetcher, SessionGuard};
use crate::url::{normalize_url, KeywordFilter, LinkFilter};
use crate::{HarvestError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Everything one harvest session produced
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source: CrawlSource,
    /// URLs returned by the crawl
    pub discovered: usize,
    /// `(category, selected URLs)` in configured order
    pub categories: Vec<(String, Vec<String>)>,
    pub outcomes: Vec<PageOutcome>,
    /// Final blocks after dedup and summarization, in corpus order
    pub blocks: Vec<String>,
    /// Blocks joined by newlines
    pub corpus: String,
}

impl HarvestReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn categorized(&self) -> usize {
        self.categories.iter().map(|(_, urls)| urls.len()).sum()
    }

    pub fn extracted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_extracted()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Runs harvest sessions for one configuration
pub struct Harvester {
    config: Config,
    handlers: HashMap<String, Arc<dyn ContentHandler>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    filter: Option<Arc<dyn LinkFilter>>,
    guard: SessionGuard,
}

impl Harvester {
    /// Creates a harvester with the default handler, filter, and summarizer
    ///
    /// Blocks are summarized only when `harvest.summary-threshold` is non-zero.
    pub fn new(config: Config) -> Self {
        let threshold = config.harvest.summary_threshold;
        let summarizer: Option<Arc<dyn Summarizer>> = if threshold > 0 {
            Some(Arc::new(LeadSummarizer::new(threshold)))
        } else {
            None
        };

        Self {
            guard: SessionGuard::from_timeout_secs(config.crawler.session_timeout_secs),
            config,
            handlers: HashMap::new(),
            summarizer,
            filter: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a content handler for one category
    pub fn with_handler(mut self, category: impl Into<String>, handler: Arc<dyn ContentHandler>) -> Self {
        self.handlers.insert(category.into(), handler);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Replaces the keyword filter used to decide which links are followed
    pub fn with_filter(mut self, filter: Arc<dyn LinkFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Abort switch for sessions run by this harvester
    ///
    /// A configured session timeout counts from [`Harvester::new`].
    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Runs one session from `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestReport)` - The session completed; individual pages may still have failed
    /// * `Err(HarvestError::SeedUnreachable)` - The seed page could not be fetched
    pub async fn harvest(&self, seed: &Url) -> Result<HarvestReport> {
        let started_at = Utc::now();
        let seed = normalize_url(seed.as_str())?;
        let fetcher = HttpFetcher::from_config(&self.config)?;

        let user_agent = if self.config.crawler.politeness {
            self.config.user_agent.identity.as_str()
        } else {
            random_user_agent()
        };
        let seed_page = fetcher
            .fetch(seed.as_str(), user_agent)
            .await
            .map_err(|e| HarvestError::SeedUnreachable {
                url: seed.to_string(),
                reason: e.to_string(),
            })?;
        let seed_text = BoilerplateStripper::from_config(&self.config.harvest).extract_text(&seed_page.body);

        let filter: Arc<dyn LinkFilter> = match &self.filter {
            Some(filter) => Arc::clone(filter),
            None => Arc::new(KeywordFilter::from_config(&self.config)),
        };
        let crawler = Crawler::new(&self.config, fetcher.clone(), self.guard.clone());
        let crawl = crawler.start(&seed, filter).await?;
        tracing::info!("Discovered {} URLs via {:?}", crawl.urls.len(), crawl.source);

        let harvest = &self.config.harvest;
        let categories = categorize_by_length(
            &crawl.urls,
            &harvest.categories,
            harvest.max_per_category,
            &harvest.asset_extensions,
        );
        for (category, urls) in categories.iter() {
            tracing::debug!("Category {}: {} URLs", category, urls.len());
        }

        let pipeline = ExtractionPipeline::new(fetcher, &self.config, self.handlers.clone())
            .with_guard(self.guard.clone())
            .with_robots(crawler.robots());
        let mut extracted = pipeline.extract(&categories, &seed).await;
        if !seed_text.is_empty() {
            extracted.blocks.insert(seed_text);
        }

        let blocks: Vec<String> = extracted.blocks.into_iter().collect();
        let mut blocks = dedupe_blocks(&blocks, harvest.dedupe_threshold);
        if let Some(summarizer) = &self.summarizer {
            blocks = blocks.iter().map(|b| summarizer.summarize(b)).collect();
        }
        let corpus = blocks.join("\n");

        Ok(HarvestReport {
            seed: seed.to_string(),
            started_at,
            finished_at: Utc::now(),
            source: crawl.source,
            discovered: crawl.urls.len(),
            categories: categories
                .iter()
                .map(|(name, urls)| (name.to_string(), urls.to_vec()))
                .collect(),
            outcomes: extracted.outcomes,
            blocks,
            corpus,
        })
    }
}
