use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Continuation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[provider]
base-url = "http://swopenapi.seoul.go.kr/api/subway"
api-key = "sample-key"
service = "realtimeStationArrival"

[budget]
daily-cap = 950
window-size = 1000
total-range = 4000
continuation = "resume"

[time]
timezone = "Asia/Seoul"

[output]
database-path = "./arrivals.db"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.budget.daily_cap, 950);
        assert_eq!(config.budget.window_size, 1000);
        assert_eq!(config.budget.total_range, 4000);
        assert_eq!(config.budget.continuation, Continuation::Resume);
        assert_eq!(config.time.timezone, "Asia/Seoul");
        assert_eq!(config.provider.service, "realtimeStationArrival");
        // Defaults apply when timeouts are omitted
        assert_eq!(config.provider.request_timeout_secs, 15);
        assert_eq!(config.provider.connect_timeout_secs, 5);
    }

    #[test]
    fn test_continuation_defaults_to_restart() {
        let content = VALID_CONFIG.replace("continuation = \"resume\"\n", "");
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.budget.continuation, Continuation::Restart);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = VALID_CONFIG.replace("window-size = 1000", "window-size = 0");
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
