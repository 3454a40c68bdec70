//! Robots.txt parser implementation
//!
//! Allow/deny matching is delegated to the robotstxt crate. `Crawl-delay` and
//! `Sitemap` are not exposed by that crate, so they are read here directly.

use chrono::{DateTime, Utc};
use robotstxt::DefaultMatcher;

/// Parsed robots.txt record for one domain
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// `Sitemap:` directives in document order
    sitemaps: Vec<String>,
    /// When the record was fetched
    fetched_at: DateTime<Utc>,
}

impl ParsedRobots {
    /// Creates a record from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        let sitemaps = directives(content)
            .filter(|(key, _)| key == "sitemap")
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
            .collect();

        Self {
            content: content.to_string(),
            sitemaps,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Sitemap URLs advertised by the site, possibly empty
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// Only an explicit matching `Disallow` denies; empty or unparsable
    /// content allows everything.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay in seconds for a specific user agent
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let normalized_agent = user_agent.to_lowercase();

        let mut group_agents: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut delay_for_wildcard: Option<f64> = None;
        let mut delay_for_agent: Option<f64> = None;

        for (key, value) in directives(&self.content) {
            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        group_agents.clear();
                        in_rules = false;
                    }
                    group_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && *d >= 0.0)
                    else {
                        continue;
                    };

                    for agent in &group_agents {
                        if agent == "*" {
                            delay_for_wildcard.get_or_insert(delay);
                        } else if normalized_agent.contains(agent.as_str()) {
                            delay_for_agent.get_or_insert(delay);
                        }
                    }
                }
                "sitemap" => {}
                _ => in_rules = true,
            }
        }

        delay_for_agent.or(delay_for_wildcard)
    }
}

/// Iterates `key: value` directives, lowercasing keys and dropping comments
fn directives(content: &str) -> impl Iterator<Item = (String, &str)> {
    content.lines().filter_map(|line| {
        let line = line.split('#').next().unwrap_or("").trim();
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}
