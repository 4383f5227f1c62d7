use crate::config::types::{
    Config, CorpusConfig, CrawlerConfig, FrontierConfig, OutputConfig, PolicyConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_policy_config(&config.policy)?;
    validate_corpus_config(&config.corpus)?;
    validate_frontier_config(&config.frontier)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if config.time_limit_secs == Some(0) {
        return Err(ConfigError::Validation(
            "time-limit-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the trap-detection policy
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    if config.target_domains.is_empty() {
        return Err(ConfigError::Validation(
            "target-domains must name at least one domain".to_string(),
        ));
    }

    for pattern in &config.target_domains {
        validate_domain_pattern(pattern)?;
    }

    if config.max_query_visits < 1 {
        return Err(ConfigError::Validation(
            "max-query-visits must be >= 1".to_string(),
        ));
    }

    if config.max_query_component_length < 1 {
        return Err(ConfigError::Validation(
            "max-query-component-length must be >= 1".to_string(),
        ));
    }

    for ext in &config.denied_extensions {
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            return Err(ConfigError::Validation(format!(
                "denied extension '{}' must be a bare extension such as 'pdf'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates corpus configuration
fn validate_corpus_config(config: &CorpusConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "corpus path cannot be empty".to_string(),
        ));
    }

    if config.index_file.is_empty() {
        return Err(ConfigError::Validation(
            "corpus index-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates frontier seeds and storage
fn validate_frontier_config(config: &FrontierConfig) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "frontier must have at least one seed URL".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS scheme",
                seed
            )));
        }
    }

    if matches!(&config.database_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "frontier database-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.analytics_path.is_empty() {
        return Err(ConfigError::Validation(
            "analytics-path cannot be empty".to_string(),
        ));
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
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
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

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'uci.edu')",
            domain
        )));
    }

    Ok(())
}
