//! Jikan API client with rate limiting and retry logic.

use super::error::JikanError;
use super::rate_limiter::RateLimiter;
use super::types::*;
use super::AnimeSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::config::JikanConfig;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: String,
    /// Rate limiter
    rate_limiter: RateLimiter,
    /// Maximum retries for failed requests
    max_retries: u32,
    /// Base delay for retry (exponential backoff)
    retry_delay_ms: u64,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(
        base_url: String,
        timeout: Duration,
        requests_per_second: f64,
        requests_per_minute: u32,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("anime-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(requests_per_second, requests_per_minute),
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a client from the `[jikan]` configuration table
    pub fn from_config(config: &JikanConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.rate_limit.requests_per_second,
            config.rate_limit.requests_per_minute,
            config.max_retries,
            config.retry_delay_ms,
        )
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }

    /// Make a GET request with rate limiting and retry logic
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, JikanError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            // Apply rate limiting before each request
            self.rate_limiter.acquire().await;

            debug!(url = %url, attempt = attempt + 1, "Making API request");

            let error = match self.client.get(&url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| {
                            warn!(url = %url, error = %e, "Failed to parse response");
                            JikanError::Decode(e.to_string())
                        });
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let message = serde_json::from_str::<JikanErrorBody>(&error_text)
                        .map(|body| body.message)
                        .unwrap_or(error_text);

                    warn!(url = %url, status = %status, error = %message, "Request failed");

                    match status {
                        // Retrying a missing resource cannot help
                        StatusCode::NOT_FOUND => {
                            return Err(JikanError::NotFound(endpoint.to_string()))
                        }
                        StatusCode::TOO_MANY_REQUESTS => JikanError::RateLimited(message),
                        _ => JikanError::Status { status, message },
                    }
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Request error");
                    JikanError::Transport(e)
                }
            };

            if attempt >= self.max_retries {
                return Err(error);
            }

            let delay = self.backoff(attempt);
            debug!(delay_ms = delay.as_millis(), "Retrying after delay");
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl AnimeSource for JikanClient {
    async fn season_now(&self, limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        info!(limit = limit, "Fetching current season");
        let response: PaginatedResponse<AnimeEntry> = self
            .get("/seasons/now", &[("limit", limit.to_string())])
            .await?;
        Ok(response.data)
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        info!(query = query, limit = limit, "Searching anime");
        let response: PaginatedResponse<AnimeEntry> = self
            .get(
                "/anime",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.data)
    }

    async fn top_by_popularity(&self, limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        info!(limit = limit, "Fetching top anime by popularity");
        let response: PaginatedResponse<AnimeEntry> = self
            .get(
                "/top/anime",
                &[("filter", "bypopularity".to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(response.data)
    }

    async fn anime_by_id(&self, mal_id: u32) -> Result<AnimeEntry, JikanError> {
        debug!(mal_id = mal_id, "Fetching anime details");
        let response: SingleResponse<AnimeEntry> =
            self.get(&format!("/anime/{}", mal_id), &[]).await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = JikanClient::new(
            "https://api.jikan.moe/v4/".to_string(),
            Duration::from_secs(10),
            3.0,
            60,
            0,
            1000,
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url, "https://api.jikan.moe/v4");
    }

    #[tokio::test]
    async fn test_from_default_config() {
        let config = shared::Config::default();
        let client = JikanClient::from_config(&config.jikan).unwrap();
        assert_eq!(client.max_retries, 0);
    }

    #[test]
    fn test_backoff_doubles() {
        let client = JikanClient::new(
            "http://localhost".to_string(),
            Duration::from_secs(1),
            3.0,
            60,
            3,
            100,
        )
        .unwrap();
        assert_eq!(client.backoff(0), Duration::from_millis(100));
        assert_eq!(client.backoff(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost refuses connections
        let client = JikanClient::new(
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(2),
            100.0,
            100,
            0,
            10,
        )
        .unwrap();

        let result = client.season_now(5).await;
        assert!(matches!(result, Err(JikanError::Transport(_))));
    }
}
