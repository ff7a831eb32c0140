use crate::config::types::{
    Config, GeneratorConfig, RetryConfig, ScraperConfig, SearchApiConfig, StorageConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_generator_config(&config.generator)?;
    validate_search_api_config(&config.search_api)?;
    validate_scraper_config(&config.scraper)?;
    validate_retry_config(&config.retry)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates the text generator configuration
fn validate_generator_config(config: &GeneratorConfig) -> Result<(), ConfigError> {
    validate_endpoint("generator.endpoint", &config.endpoint)?;

    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "generator.api-key cannot be empty".to_string(),
        ));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "generator.model cannot be empty".to_string(),
        ));
    }

    validate_timeout("generator.timeout-secs", config.timeout_secs)
}

/// Validates the search API configuration
///
/// Credentials are optional here: a provider without them reports a
/// non-fatal error at fetch time and the scrape fallback takes over.
fn validate_search_api_config(config: &SearchApiConfig) -> Result<(), ConfigError> {
    validate_endpoint("search-api.articles-endpoint", &config.articles_endpoint)?;
    validate_endpoint("search-api.videos-endpoint", &config.videos_endpoint)?;
    validate_endpoint("search-api.video-watch-url", &config.video_watch_url)?;
    validate_timeout("search-api.timeout-secs", config.timeout_secs)
}

/// Validates the browser scraping configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_endpoint("scraper.articles-search-url", &config.articles_search_url)?;
    validate_endpoint("scraper.videos-search-url", &config.videos_search_url)?;
    validate_timeout(
        "scraper.navigation-timeout-secs",
        config.navigation_timeout_secs,
    )?;
    validate_timeout("scraper.marker-timeout-secs", config.marker_timeout_secs)?;

    if let Some(exe) = &config.chrome_executable {
        if exe.trim().is_empty() {
            return Err(ConfigError::Validation(
                "scraper.chrome-executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the retry policy
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry.max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if let Some(deadline) = config.fetch_deadline_secs {
        validate_timeout("retry.fetch-deadline-secs", deadline)?;
    }

    Ok(())
}

/// Validates the storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "storage.database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Endpoints must be absolute http(s) URLs
fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}

fn validate_timeout(field: &str, secs: u64) -> Result<(), ConfigError> {
    if secs < 1 {
        return Err(ConfigError::Validation(format!(
            "{} must be >= 1 second, got {}",
            field, secs
        )));
    }
    Ok(())
}
