//! The `urls` subcommand: list the stage 1 URLs a crawl would start from.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use voit_lib::{read_municipality_ids, CrawlConfig, CrawlContext, Endpoints, DEFAULT_IDS_FILE};

#[derive(Args)]
pub struct UrlsArgs {
    /// File with one municipality id per line
    #[arg(long, default_value = DEFAULT_IDS_FILE)]
    pub ids: PathBuf,

    /// Override the API base URL (defaults to VOIT_BASE_URL or the public API)
    #[arg(long)]
    pub base_url: Option<String>,
}

pub fn run(args: &UrlsArgs) -> Result<()> {
    let ids = read_municipality_ids(&args.ids)
        .with_context(|| format!("reading municipality ids from {}", args.ids.display()))?;
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| CrawlConfig::from_env().base_url);
    let endpoints = Endpoints::with_base_url(&base_url);

    for id in ids {
        println!("{}", CrawlContext::new(id).party_lists_url(&endpoints));
    }
    Ok(())
}
