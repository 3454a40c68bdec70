/// Checks if a host matches an allowed-domain pattern
///
/// Patterns are either exact (`"example.com"`) or wildcard (`"*.example.com"`).
/// A wildcard covers the bare domain and any depth of subdomain.
///
/// # Examples
///
/// ```
/// use site_harvest::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "jobs.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Checks a host against a list of patterns; an empty list allows every host
pub fn matches_any(patterns: &[String], candidate: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| matches_wildcard(p, candidate))
}
