//! HTTP client for the vlaanderenkiest.be election API.

use std::time::Duration;

use url::Url;

use crate::{endpoints::Endpoints, user_agent::get_user_agent, Error};

/// HTTP client for the vlaanderenkiest.be election API.
///
/// Returns raw response bodies. One `reqwest::Client` is built up front with a
/// randomly picked browser user agent and reused for every request.
pub struct Client {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl Client {
    /// Creates a client for the given endpoints with a specific request timeout.
    pub fn with_endpoints(endpoints: Endpoints, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self { http, endpoints })
    }

    /// The endpoint templates this client was configured with.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// Any non-2xx status is an [`Error::HttpStatus`] carrying a truncated body.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let url = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL {}: {}", url, e);
            Error::InvalidUrl(url.to_string())
        })?;

        let resp = self
            .http
            .get(url.clone())
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "nl-BE,nl;q=0.9,en;q=0.8")
            .header("referer", "https://vlaanderenkiest.be/verkiezingen2018/")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to get {}: {}", url, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::warn!("Failed to read response body from {}: {}", url, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::warn!("{} returned status {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &body[..idx]),
    }
}
