//! CLI subcommand implementations.

pub mod crawl;
pub mod urls;
