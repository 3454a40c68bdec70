//! HTML parser for link discovery
//!
//! Extracts hyperlink targets from `<a href>` elements, resolved against the
//! page URL and normalized to their identity form.

use crate::url::resolve_and_normalize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Distinct normalized link targets, in document order
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts links and title
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">` that resolves to an HTTP(S) URL.
///
/// **Exclude:** `javascript:`, `mailto:`, `tel:`, `data:` targets and
/// fragment-only anchors. Links differing only by fragment or query collapse
/// to one entry.
///
/// # Example
///
/// ```
/// use site_harvest::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Home</title></head><body><a href="/about#team">About</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Home".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/about");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.trim_start().starts_with("data:"))
        .filter_map(|href| resolve_and_normalize(base_url, href))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}
