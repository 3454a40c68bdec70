use crate::UrlError;
use url::Url;

/// Normalizes a URL into its identity form
///
/// The identity of a page is its scheme, host (with port), and path. Two URLs
/// that differ only in query string or fragment name the same page.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Drop the query string and fragment
///
/// Host lowercasing, dot-segment removal, and the empty-path-to-`/` rule are
/// applied by the `url` parser itself.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/careers?ref=nav#open").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/careers");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves an href against a base URL and normalizes the result
///
/// Returns `None` for hrefs that cannot be resolved or that point at
/// non-HTTP(S) targets (`mailto:`, `javascript:` and friends).
pub fn resolve_and_normalize(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let joined = base.join(href).ok()?;
    normalize_parsed(joined).ok()
}

fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}
