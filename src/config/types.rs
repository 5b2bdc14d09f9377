use serde::Deserialize;

/// Main configuration structure for Railsnap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub budget: BudgetConfig,
    pub time: TimeConfig,
    pub output: OutputConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the open-data API
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API key issued by the data provider
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Service name appended to the request path
    pub service: String,

    /// Overall request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    5
}

/// Daily call-budget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    /// Maximum number of upstream calls permitted per logical day
    #[serde(rename = "daily-cap")]
    pub daily_cap: u32,

    /// Number of items requested per call
    #[serde(rename = "window-size")]
    pub window_size: u32,

    /// Total number of item indices to cover, starting from 0
    #[serde(rename = "total-range")]
    pub total_range: u32,

    /// How a new run treats windows already called earlier the same day
    #[serde(default)]
    pub continuation: Continuation,
}

/// Cross-run continuation policy within one logical day.
///
/// `Restart` re-covers the range from the beginning on every run, so a
/// day with more windows than budget may never reach the tail of the
/// range. `Resume` skips windows already present in today's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continuation {
    #[default]
    Restart,
    Resume,
}

/// Operating-timezone configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TimeConfig {
    /// IANA timezone name the logical day is reckoned in (e.g. "Asia/Seoul")
    pub timezone: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}
