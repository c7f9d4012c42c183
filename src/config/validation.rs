use crate::config::types::{
    ApiConfig, HarvestConfig, HttpConfig, OutputConfig, PagingConfig, MAX_PAGE_SIZE,
};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &HarvestConfig) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_http_config(&config.http)?;
    validate_paging_config(&config.paging)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.format != "json" {
        return Err(ConfigError::Validation(format!(
            "format must be 'json', got '{}'",
            config.format
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.retries < 1 {
        return Err(ConfigError::Validation(format!(
            "retries must be >= 1, got {}",
            config.retries
        )));
    }

    validate_seconds("retry-delay-secs", config.retry_delay_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_paging_config(config: &PagingConfig) -> Result<(), ConfigError> {
    for (name, size) in [
        ("catalog-page-size", config.catalog_page_size),
        ("io-page-size", config.io_page_size),
    ] {
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_PAGE_SIZE, size
            )));
        }
    }

    validate_seconds("delay-secs", config.delay_secs)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("dir cannot be empty".to_string()));
    }

    for (name, stem) in [
        ("catalog-stem", &config.catalog_stem),
        ("io-stem", &config.io_stem),
    ] {
        if stem.is_empty() || stem.contains(|c: char| c == '/' || c == '\\') {
            return Err(ConfigError::Validation(format!(
                "{} must be a plain file name, got '{}'",
                name, stem
            )));
        }
    }

    if config.catalog_stem == config.io_stem {
        return Err(ConfigError::Validation(
            "catalog-stem and io-stem must differ".to_string(),
        ));
    }

    Ok(())
}

/// Delays become a `Duration`, so they must be representable as one
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    Ok(())
}
