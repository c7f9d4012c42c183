//! HTTP transport
//!
//! This module handles every request sent to the upstream:
//! - Building the HTTP client with a user agent and timeout
//! - GET with JSON decoding
//! - Retry with linear backoff on any failure
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Network error / timeout | Retry |
//! | Non-2xx status | Retry |
//! | Body is not JSON | Retry |
//! | Attempts exhausted | `HarvestError::Transport` |
//!
//! Before attempt `n + 1` the transport sleeps `base_delay * n`; there is no
//! sleep after the last attempt.

use crate::api::PageRequest;
use crate::config::HttpConfig;
use crate::{HarvestError, Result};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Source of upstream JSON documents
///
/// The fetchers only see this trait, so pagination can be exercised against
/// canned documents.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches and decodes the document for one page request
    async fn get_json(&self, request: &PageRequest) -> Result<Value>;
}

/// Bounded retry with linearly increasing delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay unit; the wait after failed attempt `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Must only be called on a validated config
    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(config.retries, config.retry_delay())
    }

    /// Wait after failed attempt `attempt` (1-based), saturating at `Duration::MAX`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Total sleeping done when every attempt fails
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts)
            .map(|n| self.delay_after(n))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Runs `op` until it succeeds or the attempts run out
    ///
    /// Sleeps `delay_after(n)` after failed attempt `n`, except after the last
    /// one. `label` identifies the operation in log lines.
    pub async fn retry<T, E, F, Fut>(
        &self,
        label: &str,
        mut op: F,
    ) -> std::result::Result<T, Exhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= self.max_attempts {
                tracing::error!("{} failed after {} attempts: {}", label, attempt, error);
                return Err(Exhausted {
                    attempts: attempt,
                    error,
                });
            }

            let delay = self.delay_after(attempt);
            tracing::warn!(
                "{} failed (attempt {}/{}): {}; retrying in {:?}",
                label,
                attempt,
                self.max_attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Last error of an operation that used up its attempts
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    policy: RetryPolicy,
}

impl HttpTransport {
    /// Creates a transport from a validated HTTP config
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self::with_client(
            build_http_client(config)?,
            RetryPolicy::from_config(config),
        ))
    }

    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// GETs `url` and decodes the body as JSON, retrying per the policy
    ///
    /// `display_url` is what appears in logs and in the error.
    pub async fn get_json_url(&self, url: &str, display_url: &str) -> Result<Value> {
        let label = format!("GET {}", display_url);
        self.policy
            // reqwest embeds the request URL, which carries the API key
            .retry(&label, move || async move {
                self.try_get(url).await.map_err(reqwest::Error::without_url)
            })
            .await
            .map_err(|exhausted| HarvestError::Transport {
                url: display_url.to_string(),
                attempts: exhausted.attempts,
                source: exhausted.error,
            })
    }

    async fn try_get(&self, url: &str) -> std::result::Result<Value, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, request: &PageRequest) -> Result<Value> {
        self.get_json_url(&request.url(), &request.redacted_url())
            .await
    }
}
