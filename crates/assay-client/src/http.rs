//! HTTP client for the price API with retry and typed JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use assay_schema::{CurrencySnapshot, PriceHistory};

use crate::api::PriceApi;

pub const CURRENCIES_PATH: &str = "/getCurrencies";
pub const TIME_POINTS_PATH: &str = "/timePoints";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON from {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("API error {status} from {path}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },
    #[error("{path}: retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        path: String,
        attempts: u32,
        last: String,
    },
}

impl ClientError {
    /// Whether the retry policy applies to this failure.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect(),
            ClientError::Status { status, .. } => RetryPolicy::should_retry_status(*status),
            _ => false,
        }
    }
}

/// Retry schedule for transient failures.
///
/// Delays grow as base, 2x base, 4x base, up to `max_retries` attempts
/// beyond the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given 0-based failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }

    /// Statuses worth retrying: rate limits and server-side failures.
    pub fn should_retry_status(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }
}

/// Client for the price API.
pub struct ApiClient {
    base_url: String,
    http: Client,
    retry: RetryPolicy,
}

/// Build an HTTP client with appropriate timeouts and connection limits.
fn build_http_client(timeout: Duration, connect_timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
}

impl ApiClient {
    /// Create a client with the default retry policy and timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_policy(
            base_url,
            RetryPolicy::default(),
            Duration::from_secs(5),
            Duration::from_secs(10),
        )
    }

    /// Create a client with an explicit retry policy and timeouts.
    pub fn with_policy(
        base_url: impl Into<String>,
        retry: RetryPolicy,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: build_http_client(timeout, connect_timeout),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the response body as `T`.
    ///
    /// Transient failures (connect errors, timeouts, 429/5xx statuses) are
    /// retried on the policy's backoff schedule. Anything else fails
    /// immediately.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            match self.try_get(path, &url).await {
                Ok(body) => {
                    return serde_json::from_str(&body).map_err(|source| ClientError::Json {
                        path: path.to_string(),
                        source,
                    });
                }
                Err(e) => {
                    if !e.is_transient() {
                        return Err(e);
                    }
                    if attempt >= self.retry.max_retries {
                        return Err(ClientError::RetriesExhausted {
                            path: path.to_string(),
                            attempts: attempt + 1,
                            last: e.to_string(),
                        });
                    }
                    let delay = self.retry.delay(attempt);
                    warn!(
                        path,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient API failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn try_get(&self, path: &str, url: &str) -> Result<String, ClientError> {
        debug!(url, "GET");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PriceApi for ApiClient {
    async fn fetch_currencies(&self) -> Result<CurrencySnapshot, ClientError> {
        self.get_json(CURRENCIES_PATH).await
    }

    async fn fetch_time_points(&self) -> Result<PriceHistory, ClientError> {
        self.get_json(TIME_POINTS_PATH).await
    }
}
