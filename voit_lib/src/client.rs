//! Retrying, rate-limited wrapper around the API client.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;
use vlaanderenkiest_api::{Client, Endpoints};

use crate::config::CrawlConfig;
use crate::error::CrawlError;

/// API client wrapper that retries transient failures and spaces requests.
///
/// Connection errors, 408, 429 and 5xx responses are retried with exponential
/// backoff and jitter. When a request delay is configured, consecutive
/// requests are kept at least the delay apart, even across concurrent callers.
pub struct PoliteClient {
    inner: Client,
    retry: RetryConfig,
    request_delay: Duration,
    /// Earliest instant the next HTTP request may be sent.
    next_slot: Mutex<Option<Instant>>,
}

struct RetryConfig {
    max_retries: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryConfig {
    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

impl PoliteClient {
    /// Builds the HTTP client described by `config`.
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let endpoints = Endpoints::with_base_url(&config.base_url);
        let inner = Client::with_endpoints(endpoints, config.timeout())?;
        Ok(Self {
            inner,
            retry: RetryConfig {
                max_retries: config.max_retries,
                base_delay_ms: config.retry_base_delay_ms,
                max_delay_ms: config.retry_max_delay_ms,
            },
            request_delay: Duration::from_millis(config.request_delay_ms),
            next_slot: Mutex::new(None),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.inner.endpoints()
    }

    /// Waits for this request's slot.
    ///
    /// Each caller reserves the next free slot under the lock and pushes it a
    /// jittered delay (at least `request_delay`) further out, so concurrent
    /// callers queue up instead of firing together.
    async fn rate_limit(&self) {
        if self.request_delay.is_zero() {
            return;
        }
        let slot = {
            let mut next_slot = self.next_slot.lock().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            let gap = self
                .request_delay
                .mul_f64(rand::thread_rng().gen_range(1.0..1.5));
            *next_slot = Some(slot + gap);
            slot
        };
        tokio::time::sleep_until(tokio::time::Instant::from_std(slot)).await;
    }

    /// Fetches `url`, retrying transient failures.
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let mut attempt = 0usize;
        loop {
            self.rate_limit().await;
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err.into());
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}), retrying in {:.1}s",
                        url,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn is_retryable(err: &vlaanderenkiest_api::Error) -> bool {
    match err {
        vlaanderenkiest_api::Error::RequestFailed => true,
        vlaanderenkiest_api::Error::HttpStatus { status, .. } => {
            *status == 408 || *status == 429 || *status >= 500
        }
        vlaanderenkiest_api::Error::InvalidUrl(_) => false,
    }
}
