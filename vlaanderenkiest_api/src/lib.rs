//! HTTP transport for the vlaanderenkiest.be 2018 election API.
//!
//! Knows the three endpoint templates the crawler walks and how to fetch a raw
//! response body from them. Parsing is left to the caller.

mod client;
mod endpoints;
mod errors;
pub mod user_agent;
pub use self::client::Client;
pub use self::endpoints::{Endpoints, DEFAULT_BASE_URL};
pub use self::errors::Error;
