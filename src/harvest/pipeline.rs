//! Concurrent text extraction over categorized URLs
//!
//! Every `(category, url)` pair is resolved against the base URL, claimed in
//! a run-wide processed set, fetched, and handed to the category's content
//! handler. At most `extraction_workers` pages are in flight at once.

use super::categorize::CategoryMap;
use super::extract::{BoilerplateStripper, ContentHandler};
use crate::config::Config;
use crate::crawler::{random_user_agent, HttpFetcher, SessionGuard};
use crate::robots::RobotsCache;
use crate::url::resolve_and_normalize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// What happened to one categorized URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Handler produced text (possibly empty, which adds no block)
    Extracted {
        url: String,
        category: String,
        text: String,
    },
    FetchFailed {
        url: String,
        reason: String,
    },
    ExtractFailed {
        url: String,
        reason: String,
    },
    /// Already processed under an earlier category
    Duplicate { url: String },
    /// robots.txt denies the URL
    Disallowed { url: String },
    /// Skipped because the session was aborted
    Aborted { url: String },
}

impl PageOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Extracted { url, .. }
            | Self::FetchFailed { url, .. }
            | Self::ExtractFailed { url, .. }
            | Self::Duplicate { url }
            | Self::Disallowed { url }
            | Self::Aborted { url } => url,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::ExtractFailed { .. })
    }
}

/// Text blocks and per-URL outcomes of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    /// Distinct non-empty extracted texts
    pub blocks: BTreeSet<String>,
    pub outcomes: Vec<PageOutcome>,
}

impl PipelineResult {
    pub fn extracted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_extracted()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Fetches categorized pages and extracts their text
pub struct ExtractionPipeline {
    fetcher: HttpFetcher,
    handlers: HashMap<String, Arc<dyn ContentHandler>>,
    default_handler: Arc<dyn ContentHandler>,
    workers: usize,
    politeness: bool,
    identity: String,
    guard: SessionGuard,
    robots: Option<Arc<RobotsCache>>,
}

impl ExtractionPipeline {
    /// Creates a pipeline
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The session HTTP fetcher
    /// * `config` - Worker budget, identity, and default handler settings
    /// * `handlers` - Per-category handlers; other categories use [`BoilerplateStripper`]
    pub fn new(
        fetcher: HttpFetcher,
        config: &Config,
        handlers: HashMap<String, Arc<dyn ContentHandler>>,
    ) -> Self {
        Self {
            fetcher,
            handlers,
            default_handler: Arc::new(BoilerplateStripper::from_config(&config.harvest)),
            workers: config.harvest.extraction_workers.max(1),
            politeness: config.crawler.politeness,
            identity: config.user_agent.identity.clone(),
            guard: SessionGuard::new(),
            robots: None,
        }
    }

    /// Shares the session abort switch
    pub fn with_guard(mut self, guard: SessionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Checks robots.txt before each fetch when crawling politely
    pub fn with_robots(mut self, robots: Arc<RobotsCache>) -> Self {
        self.robots = Some(robots);
        self
    }

    fn handler_for(&self, category: &str) -> Arc<dyn ContentHandler> {
        self.handlers
            .get(category)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_handler))
    }

    fn user_agent(&self) -> String {
        if self.politeness {
            self.identity.clone()
        } else {
            random_user_agent().to_string()
        }
    }

    /// Extracts text from every categorized URL
    ///
    /// Per-URL failures are recorded in the outcomes and never abort the run.
    pub async fn extract(&self, categories: &CategoryMap, base: &Url) -> PipelineResult {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut processed: HashSet<String> = HashSet::new();
        let mut result = PipelineResult::default();
        let mut tasks = JoinSet::new();

        for (category, urls) in categories.iter() {
            for raw in urls {
                let Some(url) = resolve_and_normalize(base, raw) else {
                    result.outcomes.push(PageOutcome::FetchFailed {
                        url: raw.clone(),
                        reason: "unresolvable URL".to_string(),
                    });
                    continue;
                };

                if !processed.insert(url.as_str().to_string()) {
                    result.outcomes.push(PageOutcome::Duplicate { url: url.into() });
                    continue;
                }

                if self.guard.is_aborted() {
                    result.outcomes.push(PageOutcome::Aborted { url: url.into() });
                    continue;
                }

                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };

                let task = PageTask {
                    fetcher: self.fetcher.clone(),
                    handler: self.handler_for(category),
                    robots: self.robots.clone().filter(|_| self.politeness),
                    guard: self.guard.clone(),
                    user_agent: self.user_agent(),
                    category: category.to_string(),
                    url,
                };
                tasks.spawn(async move {
                    let outcome = task.run().await;
                    drop(permit);
                    outcome
                });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    if let PageOutcome::Extracted { text, .. } = &outcome {
                        if !text.is_empty() {
                            result.blocks.insert(text.clone());
                        }
                    }
                    result.outcomes.push(outcome);
                }
                Err(e) => tracing::warn!("Extraction task failed: {}", e),
            }
        }

        tracing::info!(
            "Extracted {} pages ({} failed), {} distinct blocks",
            result.extracted_count(),
            result.failure_count(),
            result.blocks.len()
        );
        result
    }
}

/// One page's fetch-and-extract job
struct PageTask {
    fetcher: HttpFetcher,
    handler: Arc<dyn ContentHandler>,
    robots: Option<Arc<RobotsCache>>,
    guard: SessionGuard,
    user_agent: String,
    category: String,
    url: Url,
}

impl PageTask {
    async fn run(self) -> PageOutcome {
        let url = self.url.to_string();

        if self.guard.is_aborted() {
            return PageOutcome::Aborted { url };
        }

        if let Some(robots) = &self.robots {
            if !robots.is_allowed(&self.url).await {
                tracing::info!("Blocked by robots.txt: {}", url);
                return PageOutcome::Disallowed { url };
            }
        }

        let page = match self.fetcher.fetch(&url, &self.user_agent).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("Failed to fetch {}: {}", url, e);
                return PageOutcome::FetchFailed {
                    url,
                    reason: e.to_string(),
                };
            }
        };

        match self.handler.extract(&page.body) {
            Ok(text) => PageOutcome::Extracted {
                url,
                category: self.category,
                text,
            },
            Err(e) => {
                tracing::warn!("Extraction failed for {} ({}): {}", url, self.category, e);
                PageOutcome::ExtractFailed {
                    url,
                    reason: e.reason,
                }
            }
        }
    }
}
