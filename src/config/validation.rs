//! Configuration validation
//!
//! All budget parameters must be validated before a run starts: an
//! invalid cap, window size, or range aborts the run before any
//! upstream call is made.

use crate::config::types::Config;
use crate::ConfigError;
use chrono_tz::Tz;
use url::Url;

/// Validates a parsed configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.provider.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "provider.api-key must not be empty".to_string(),
        ));
    }

    if config.provider.service.trim().is_empty() {
        return Err(ConfigError::Validation(
            "provider.service must not be empty".to_string(),
        ));
    }

    if Url::parse(&config.provider.base_url).is_err() {
        return Err(ConfigError::InvalidUrl(config.provider.base_url.clone()));
    }

    if config.provider.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "provider.request-timeout-secs must be positive".to_string(),
        ));
    }

    if config.budget.daily_cap == 0 {
        return Err(ConfigError::Validation(
            "budget.daily-cap must be positive".to_string(),
        ));
    }

    if config.budget.window_size == 0 {
        return Err(ConfigError::Validation(
            "budget.window-size must be positive".to_string(),
        ));
    }

    if config.budget.total_range == 0 {
        return Err(ConfigError::Validation(
            "budget.total-range must be positive".to_string(),
        ));
    }

    parse_timezone(&config.time.timezone)?;

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses the configured IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}
