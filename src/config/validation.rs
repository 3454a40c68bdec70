use crate::config::types::{Config, CrawlerConfig, HarvestConfig, HttpConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_harvest_config(&config.harvest)?;

    if config.output.corpus_path.is_empty() {
        return Err(ConfigError::Validation(
            "corpus_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_worker_count("max_workers", config.max_workers)?;

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

fn validate_worker_count(name: &str, value: usize) -> Result<(), ConfigError> {
    if !(1..=100).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and 100, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent identity cannot be empty".to_string(),
        ));
    }

    if config.identity.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent identity contains control characters: {:?}",
            config.identity
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 5 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 5, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates categorization and extraction configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category keyword is required".to_string(),
        ));
    }

    if let Some(empty) = config.categories.iter().position(|c| c.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "category keyword #{} is empty",
            empty
        )));
    }

    if config.max_per_category == 0 {
        return Err(ConfigError::Validation(
            "max_per_category must be >= 1".to_string(),
        ));
    }

    validate_worker_count("extraction_workers", config.extraction_workers)?;

    for ext in &config.asset_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "asset extension '{}' must start with '.'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    validate_domain_string(domain)
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
