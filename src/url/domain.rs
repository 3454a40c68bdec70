use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the key robots.txt records are cached under: host plus explicit port
///
/// Different ports on the same host serve different robots.txt files, so the
/// port is part of the key whenever the URL carries a non-default one.
pub fn domain_key(url: &Url) -> Option<String> {
    let host = extract_domain(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Builds the robots.txt URL for the site a URL belongs to
pub fn robots_url(url: &Url) -> Option<Url> {
    domain_key(url)?;
    url.join("/robots.txt").ok()
}
