//! HTTP provider implementation
//!
//! Builds the reqwest client and issues one GET per page window. The
//! request path follows the upstream convention:
//! `{base}/{api-key}/json/{service}/{start}/{end}/`.

use crate::config::ProviderConfig;
use crate::provider::parse::parse_response;
use crate::provider::{ArrivalSource, FetchError, FetchPage};
use crate::window::PageWindow;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Result code the upstream uses for a successful page
const SUCCESS_CODE: &str = "INFO-000";

/// Builds an HTTP client with bounded timeouts
///
/// # Arguments
///
/// * `config` - The provider configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ProviderConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The real fetch collaborator backed by the upstream open-data API
pub struct HttpProvider {
    client: Client,
    base_url: String,
    api_key: String,
    service: String,
}

impl HttpProvider {
    /// Creates a provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            service: config.service.clone(),
        })
    }

    fn build_url(&self, window: PageWindow) -> String {
        format!(
            "{}/{}/json/{}/{}/{}/",
            self.base_url, self.api_key, self.service, window.start, window.end
        )
    }
}

#[async_trait]
impl ArrivalSource for HttpProvider {
    async fn fetch(&self, window: PageWindow) -> Result<FetchPage, FetchError> {
        let url = self.build_url(window);
        tracing::debug!("Fetching window {} from upstream", window);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { window }
            } else {
                FetchError::Http { window, source: e }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                window,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { window }
            } else {
                FetchError::Http { window, source: e }
            }
        })?;

        let parsed = parse_response(&body, window)?;

        if parsed.code != SUCCESS_CODE {
            return Err(FetchError::Api {
                window,
                code: parsed.code,
                message: parsed.message,
            });
        }

        tracing::debug!(
            "Window {} returned {} rows (total_count: {:?})",
            window,
            parsed.rows.len(),
            parsed.total_count
        );

        Ok(FetchPage {
            window,
            total_count: parsed.total_count,
            rows: parsed.rows,
        })
    }
}
