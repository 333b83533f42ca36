use crate::config::types::{BrowserConfig, Config, SiteConfig, TimingConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_browser_config(&config.browser)?;
    validate_timing_config(&config.timing)?;
    Ok(())
}

/// Validates site routing configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_url must not end with '/', got '{}'",
            config.base_url
        )));
    }

    validate_path("search_path", &config.search_path)?;
    validate_path("detail_path", &config.detail_path)?;

    if !config.detail_path.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "detail_path must end with '/', got '{}'",
            config.detail_path
        )));
    }

    if config.default_regulation.contains('/') {
        return Err(ConfigError::Validation(format!(
            "default_regulation cannot contain '/', got '{}'",
            config.default_regulation
        )));
    }

    Ok(())
}

fn validate_path(field: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got '{}'",
            field, path
        )));
    }
    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(arg) = config.extra_args.iter().find(|a| !a.starts_with("--")) {
        return Err(ConfigError::Validation(format!(
            "extra_args entries must start with '--', got '{}'",
            arg
        )));
    }

    Ok(())
}

/// Validates timing configuration
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= 1000ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    if config.poll_attempts < 1 || config.poll_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "poll_attempts must be between 1 and 20, got {}",
            config.poll_attempts
        )));
    }

    Ok(())
}
