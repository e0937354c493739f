//! Crawl settings with environment overrides.

use std::time::Duration;

use vlaanderenkiest_api::DEFAULT_BASE_URL;

/// Upper bound on requests in flight.
pub const MAX_CONCURRENCY: usize = 1024;

/// Settings for a crawl run.
///
/// Defaults suit the public API: 16 requests in flight, two retries on
/// transient failures, no extra delay between requests.
#[derive(Clone, Debug, PartialEq)]
pub struct CrawlConfig {
    /// Base URL the endpoint templates are appended to.
    pub base_url: String,
    /// Maximum number of HTTP requests in flight.
    pub concurrency: usize,
    /// Retries after the first attempt for retryable failures.
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    /// Minimum gap between consecutive requests, jittered. 0 disables it.
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: 16,
            max_retries: 2,
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 30_000,
            request_delay_ms: 0,
            timeout_secs: 30,
        }
    }
}

impl CrawlConfig {
    /// Defaults overridden by `VOIT_*` environment variables.
    ///
    /// Unset or unparseable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`CrawlConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|val| val.trim().parse::<u64>().ok());
        Self {
            base_url: lookup("VOIT_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
            concurrency: parsed("VOIT_CONCURRENCY")
                .map(|n| n as usize)
                .unwrap_or(defaults.concurrency),
            max_retries: parsed("VOIT_RETRY_MAX")
                .map(|n| n as usize)
                .unwrap_or(defaults.max_retries),
            retry_base_delay_ms: parsed("VOIT_RETRY_BASE_MS")
                .unwrap_or(defaults.retry_base_delay_ms),
            retry_max_delay_ms: parsed("VOIT_RETRY_MAX_MS")
                .unwrap_or(defaults.retry_max_delay_ms),
            request_delay_ms: parsed("VOIT_REQUEST_DELAY_MS")
                .unwrap_or(defaults.request_delay_ms),
            timeout_secs: parsed("VOIT_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        }
    }

    /// Concurrency clamped to `1..=MAX_CONCURRENCY`.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, MAX_CONCURRENCY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_production() {
        let config = CrawlConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.concurrency, 16);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.request_delay_ms, 0);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = CrawlConfig::from_lookup(lookup_from(&[
            ("VOIT_BASE_URL", "http://localhost:9000"),
            ("VOIT_CONCURRENCY", "4"),
            ("VOIT_RETRY_MAX", "5"),
            ("VOIT_REQUEST_DELAY_MS", "250"),
        ]));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_delay_ms, 250);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = CrawlConfig::from_lookup(lookup_from(&[
            ("VOIT_CONCURRENCY", "many"),
            ("VOIT_BASE_URL", "  "),
        ]));
        assert_eq!(config, CrawlConfig::default());
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let config = CrawlConfig {
            concurrency: 0,
            ..CrawlConfig::default()
        };
        assert_eq!(config.effective_concurrency(), 1);
    }

    #[test]
    fn huge_concurrency_is_capped() {
        let config = CrawlConfig {
            concurrency: usize::MAX,
            ..CrawlConfig::default()
        };
        assert_eq!(config.effective_concurrency(), MAX_CONCURRENCY);
    }
}
