//! Crawler coordinator - URL discovery for one harvest session
//!
//! A session runs `idle -> sitemap-attempt -> done` when the site's sitemap
//! yields usable URLs, and `idle -> sitemap-attempt -> link-crawl -> done`
//! otherwise.
//!
//! The link crawl is level-synchronous: every URL at depth `d` is handed to a
//! fixed pool of workers sharing one queue, and the pool is joined before
//! depth `d + 1` starts.

use crate::config::Config;
use crate::crawler::fetcher::{random_user_agent, FetchError, HttpFetcher};
use crate::crawler::parser::parse_html;
use crate::crawler::session::{SessionGuard, VisitedSet};
use crate::robots::RobotsCache;
use crate::sitemap::SitemapResolver;
use crate::url::{normalize_url, LinkFilter};
use crate::HarvestError;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use url::Url;

/// Where a session's URL set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlSource {
    Sitemap,
    LinkCrawl,
}

/// URLs discovered by one crawl session
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub urls: HashSet<String>,
    pub source: CrawlSource,
}

/// Result of processing one URL in the link crawl
#[derive(Debug)]
enum Visit {
    /// Another worker already claimed the URL
    AlreadyClaimed,
    /// robots.txt denies the URL
    Denied,
    /// Fetch failed; the branch is pruned
    Failed(FetchError),
    /// Page fetched; these links are new and pass the filter
    Fetched(Vec<Url>),
}

/// State shared by every worker of a session
struct CrawlContext {
    fetcher: HttpFetcher,
    robots: Arc<RobotsCache>,
    visited: VisitedSet,
    guard: SessionGuard,
    filter: Arc<dyn LinkFilter>,
    politeness: bool,
    identity: String,
}

impl CrawlContext {
    fn user_agent(&self) -> &str {
        if self.politeness {
            &self.identity
        } else {
            random_user_agent()
        }
    }

    /// Claims, checks, fetches, and parses one URL
    async fn visit(&self, url: &Url) -> Visit {
        if !self.visited.claim(url) {
            return Visit::AlreadyClaimed;
        }

        if self.politeness && !self.robots.is_allowed(url).await {
            tracing::info!("Blocked by robots.txt: {}", url);
            return Visit::Denied;
        }

        let page = match self.fetcher.fetch(url.as_str(), self.user_agent()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!("Failed to fetch {}: {}", url, e);
                return Visit::Failed(e);
            }
        };

        let links = if page.is_html() {
            let parsed = parse_html(&page.body, url);
            tracing::debug!(
                "Fetched {} ({}), {} links",
                url,
                parsed.title.as_deref().unwrap_or("untitled"),
                parsed.links.len()
            );
            parsed
                .links
                .into_iter()
                .filter(|link| self.filter.includes(link.as_str()) && !self.visited.contains(link))
                .collect()
        } else {
            Vec::new()
        };

        if self.politeness {
            if let Some(delay) = self.robots.crawl_delay(url).await {
                tracing::debug!("Honoring crawl-delay of {:?} after {}", delay, url);
                tokio::time::sleep(delay).await;
            }
        }

        Visit::Fetched(links)
    }
}

/// Concurrent, depth-bounded, robots-aware URL discoverer
pub struct Crawler {
    fetcher: HttpFetcher,
    robots: Arc<RobotsCache>,
    sitemaps: SitemapResolver,
    guard: SessionGuard,
    max_workers: usize,
    depth_limit: u32,
    politeness: bool,
    identity: String,
}

impl Crawler {
    /// Creates a crawler for one session
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `fetcher` - The session HTTP fetcher
    /// * `guard` - Abort switch for the session
    pub fn new(config: &Config, fetcher: HttpFetcher, guard: SessionGuard) -> Self {
        let identity = config.user_agent.identity.clone();

        Self {
            robots: Arc::new(RobotsCache::new(fetcher.clone(), identity.clone())),
            sitemaps: SitemapResolver::new(
                fetcher.clone(),
                identity.clone(),
                config.crawler.sitemap_strategy,
            ),
            fetcher,
            guard,
            max_workers: config.crawler.max_workers.max(1),
            depth_limit: config.crawler.depth_limit,
            politeness: config.crawler.politeness,
            identity,
        }
    }

    /// The session's robots.txt cache, shareable with later stages
    pub fn robots(&self) -> Arc<RobotsCache> {
        Arc::clone(&self.robots)
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Discovers URLs reachable from the seed
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Filtered sitemap URLs, or every URL claimed by the link crawl
    /// * `Err(HarvestError::SeedUnreachable)` - The link crawl could not fetch the seed
    pub async fn start(
        &self,
        seed: &Url,
        filter: Arc<dyn LinkFilter>,
    ) -> Result<CrawlOutcome, HarvestError> {
        let seed = normalize_url(seed.as_str())?;

        if let Some(urls) = self.try_sitemap(&seed, filter.as_ref()).await {
            return Ok(CrawlOutcome {
                urls,
                source: CrawlSource::Sitemap,
            });
        }

        tracing::info!("No usable URLs from sitemap, crawling links from {}", seed);
        let urls = self.link_crawl(&seed, filter).await?;
        Ok(CrawlOutcome {
            urls,
            source: CrawlSource::LinkCrawl,
        })
    }

    /// Attempts sitemap-driven discovery via the first advertised sitemap
    async fn try_sitemap(&self, seed: &Url, filter: &dyn LinkFilter) -> Option<HashSet<String>> {
        let sitemap_url = self.robots.sitemaps(seed).await.into_iter().next()?;
        tracing::info!("Found sitemap {}, parsing URLs", sitemap_url);

        let listed = self.sitemaps.resolve(&sitemap_url).await?;
        let urls: HashSet<String> = listed
            .iter()
            .filter_map(|u| normalize_url(u).ok())
            .map(String::from)
            .filter(|u| filter.includes(u))
            .collect();

        tracing::info!(
            "Sitemap listed {} URLs, {} pass the filter",
            listed.len(),
            urls.len()
        );

        if urls.is_empty() {
            None
        } else {
            Some(urls)
        }
    }

    /// Level-synchronous link crawl from the seed
    async fn link_crawl(
        &self,
        seed: &Url,
        filter: Arc<dyn LinkFilter>,
    ) -> Result<HashSet<String>, HarvestError> {
        let ctx = Arc::new(CrawlContext {
            fetcher: self.fetcher.clone(),
            robots: Arc::clone(&self.robots),
            visited: VisitedSet::new(),
            guard: self.guard.clone(),
            filter,
            politeness: self.politeness,
            identity: self.identity.clone(),
        });

        let mut frontier = match ctx.visit(seed).await {
            Visit::Fetched(links) => links,
            Visit::Failed(e) => {
                return Err(HarvestError::SeedUnreachable {
                    url: seed.to_string(),
                    reason: e.to_string(),
                })
            }
            Visit::Denied | Visit::AlreadyClaimed => Vec::new(),
        };

        let mut depth = 0;
        while depth < self.depth_limit && !frontier.is_empty() {
            if ctx.guard.is_aborted() {
                tracing::warn!("Session aborted at depth {}, stopping crawl", depth);
                break;
            }

            depth += 1;
            tracing::info!("Depth {}: {} URLs to visit", depth, frontier.len());
            frontier = self.crawl_level(&ctx, frontier).await;
        }

        tracing::info!("Link crawl claimed {} URLs", ctx.visited.len());
        Ok(ctx.visited.snapshot())
    }

    /// Visits one depth level with a fixed worker pool and returns the next frontier
    async fn crawl_level(&self, ctx: &Arc<CrawlContext>, frontier: Vec<Url>) -> Vec<Url> {
        let worker_count = self.max_workers.min(frontier.len());

        let mut unique = HashSet::new();
        let queue: VecDeque<Url> = frontier
            .into_iter()
            .filter(|u| unique.insert(u.as_str().to_string()))
            .collect();
        let queue = Arc::new(Mutex::new(queue));

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            let ctx = Arc::clone(ctx);
            let queue = Arc::clone(&queue);
            workers.spawn(async move { run_worker(ctx, queue).await });
        }

        let mut next = Vec::new();
        let mut seen = HashSet::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(links) => next.extend(
                    links
                        .into_iter()
                        .filter(|u| seen.insert(u.as_str().to_string())),
                ),
                Err(e) => tracing::warn!("Crawl worker failed: {}", e),
            }
        }
        next
    }
}

/// Pulls URLs from the level queue until it is empty or the session aborts
async fn run_worker(ctx: Arc<CrawlContext>, queue: Arc<Mutex<VecDeque<Url>>>) -> Vec<Url> {
    let mut discovered = Vec::new();

    loop {
        if ctx.guard.is_aborted() {
            break;
        }

        let next = queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        let Some(url) = next else {
            break;
        };

        if let Visit::Fetched(links) = ctx.visit(&url).await {
            discovered.extend(links);
        }
    }

    discovered
}
