//! Error types for the library layer.

use std::fmt;

/// Fatal errors of the library layer, wrapping transport errors and adding
/// I/O failures and contract violations.
///
/// Per-chain failures during a crawl are not `CrawlError`s; see
/// [`crate::pipeline::Abandon`].
#[derive(Debug)]
pub enum CrawlError {
    /// An error from the underlying API client.
    Api(vlaanderenkiest_api::Error),
    /// Reading an input file failed.
    Io(std::io::Error),
    /// A function was called with input outside its contract.
    InvalidInput(String),
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CrawlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<vlaanderenkiest_api::Error> for CrawlError {
    fn from(e: vlaanderenkiest_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<std::io::Error> for CrawlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_keeps_its_source() {
        let err = CrawlError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "I/O error: gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_input_has_no_source() {
        let err = CrawlError::InvalidInput("document is an array".into());
        assert_eq!(err.to_string(), "Invalid input: document is an array");
        assert!(err.source().is_none());
    }
}
