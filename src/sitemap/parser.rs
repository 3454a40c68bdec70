//! Sitemap XML parsing (sitemaps.org 0.9 url-set and sitemap-index documents)

use serde::Deserialize;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: nested sitemap URLs
    Index(Vec<String>),
}

/// Both document kinds deserialize into one shape; the root element name is
/// not checked, only which child lists are populated.
#[derive(Debug, Default, Deserialize)]
struct RawSitemap {
    #[serde(default)]
    url: Vec<RawEntry>,
    #[serde(default)]
    sitemap: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    loc: Option<String>,
}

fn locations(entries: Vec<RawEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|e| e.loc)
        .map(|loc| loc.trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Parses sitemap XML
///
/// Returns `None` for malformed XML and for documents with no `<loc>` entries.
///
/// # Example
///
/// ```
/// use site_harvest::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/about</loc></url>
/// </urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml),
///     Some(SitemapDocument::UrlSet(vec!["https://example.com/about".to_string()]))
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Option<SitemapDocument> {
    let raw: RawSitemap = match quick_xml::de::from_str(xml) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Malformed sitemap XML: {}", e);
            return None;
        }
    };

    let urls = locations(raw.url);
    if !urls.is_empty() {
        return Some(SitemapDocument::UrlSet(urls));
    }

    let nested = locations(raw.sitemap);
    if !nested.is_empty() {
        return Some(SitemapDocument::Index(nested));
    }

    None
}
