//! Crawl core for the vlaanderenkiest.be 2018 local election results.
//!
//! Walks municipality → party list → candidate list → candidate results,
//! locates payloads in the loosely shaped JSON by key, joins candidates with
//! their results and emits one [`ResultRecord`] per elected-flagged candidate.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod merge;
pub mod pipeline;
pub mod search;

pub use vlaanderenkiest_api;
pub use vlaanderenkiest_api::{Endpoints, DEFAULT_BASE_URL};

pub use client::PoliteClient;
pub use config::{CrawlConfig, MAX_CONCURRENCY};
pub use context::CrawlContext;
pub use error::CrawlError;
pub use ids::{parse_municipality_ids, read_municipality_ids, DEFAULT_IDS_FILE};
pub use merge::{merge_candidates, ResultRecord};
pub use pipeline::{Abandon, CrawlOutput, CrawlReport, Crawler, Stage};
pub use search::find_by_key;
