//! Error types for the API client.

/// Errors that can occur when fetching an API resource.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The URL handed to the client could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
