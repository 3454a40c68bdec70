//! Keyword categorization of discovered URLs
//!
//! Categories claim URLs in the configured keyword order: a URL matching
//! several keywords belongs to the earliest-listed one only.

use crate::url::decode_for_matching;
use std::collections::HashSet;

/// Category name to capped, ordered URL list, in configured category order
///
/// Categories with no matches are present with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryMap {
    /// URLs of one category, if the category was configured
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, urls)| urls.as_slice())
    }

    /// `(category, urls)` pairs in configured order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, urls)| (name.as_str(), urls.as_slice()))
    }

    /// Number of categories, including empty ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of categorized URLs
    pub fn url_count(&self) -> usize {
        self.entries.iter().map(|(_, urls)| urls.len()).sum()
    }
}

/// True if the URL names a static asset by extension (case-insensitive)
pub fn is_ignored_asset(url: &str, asset_extensions: &[String]) -> bool {
    let lowered = url.to_lowercase();
    asset_extensions
        .iter()
        .any(|ext| lowered.ends_with(&ext.to_lowercase()))
}

/// Sorts URLs into keyword categories
///
/// For each keyword in order, selects URLs that contain it (case-sensitive),
/// are not yet claimed by an earlier category, and are not static assets;
/// sorts them by `ordering` (ties broken by URL string), keeps the first
/// `max_per_category`, and claims those.
///
/// # Example
///
/// ```
/// use site_harvest::harvest::categorize;
///
/// let urls = ["https://x.no/about/careers", "https://x.no/careers", "https://x.no/logo.png"];
/// let map = categorize(
///     urls,
///     &["about".to_string(), "career".to_string()],
///     4,
///     &[".png".to_string()],
///     |url: &str| url.len(),
/// );
/// assert_eq!(map.get("about").unwrap(), ["https://x.no/about/careers"]);
/// assert_eq!(map.get("career").unwrap(), ["https://x.no/careers"]);
/// ```
pub fn categorize<I, S, K, F>(
    urls: I,
    categories: &[String],
    max_per_category: usize,
    asset_extensions: &[String],
    ordering: F,
) -> CategoryMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    K: Ord,
    F: Fn(&str) -> K,
{
    let candidates: Vec<String> = urls
        .into_iter()
        .map(|u| u.as_ref().to_string())
        .filter(|u| !is_ignored_asset(u, asset_extensions))
        .collect();

    let mut claimed: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(categories.len());

    for category in categories {
        let mut selected: Vec<&String> = candidates
            .iter()
            .filter(|u| {
                decode_for_matching(u).contains(category.as_str()) && !claimed.contains(u.as_str())
            })
            .collect();

        selected.sort_by(|a, b| {
            ordering(a.as_str())
                .cmp(&ordering(b.as_str()))
                .then_with(|| a.cmp(b))
        });
        selected.dedup();
        selected.truncate(max_per_category);

        let kept: Vec<String> = selected.into_iter().cloned().collect();
        claimed.extend(kept.iter().cloned());
        entries.push((category.clone(), kept));
    }

    CategoryMap { entries }
}

/// [`categorize`] with the default ordering: shortest URL first
pub fn categorize_by_length<I, S>(
    urls: I,
    categories: &[String],
    max_per_category: usize,
    asset_extensions: &[String],
) -> CategoryMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    categorize(urls, categories, max_per_category, asset_extensions, |u: &str| {
        u.len()
    })
}
