use crate::config::types::{Config, HttpConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site layout
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    for (name, marker) in [
        ("category-marker", &config.category_marker),
        ("item-marker", &config.item_marker),
        ("server-marker", &config.server_marker),
        ("download-marker", &config.download_marker),
        ("poster-marker", &config.poster_marker),
    ] {
        validate_marker(name, marker)?;
    }

    Ok(())
}

/// Markers are spliced into `[attr*="..."]` selectors
fn validate_marker(name: &str, marker: &str) -> Result<(), ConfigError> {
    if marker.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    if marker.contains('"') || marker.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{} must not contain quotes or backslashes, got '{}'",
            name, marker
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    for (name, file) in [
        ("progress-file", &config.progress_file),
        ("final-file", &config.final_file),
    ] {
        if file.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        if file.contains('/') || file.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "{} must be a bare file name, got '{}'",
                name, file
            )));
        }
    }

    if config.progress_file == config.final_file {
        return Err(ConfigError::Validation(format!(
            "progress-file and final-file must differ, both are '{}'",
            config.final_file
        )));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(
            "checkpoint-interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}
