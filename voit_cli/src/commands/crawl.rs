//! The `crawl` subcommand: fetch and merge results for every municipality.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use voit_lib::{read_municipality_ids, CrawlConfig, Crawler, DEFAULT_IDS_FILE};

use crate::output::{render_records, write_output, OutputFormat};

/// Arguments for the `crawl` subcommand.
#[derive(Args)]
pub struct CrawlArgs {
    /// File with one municipality id per line
    #[arg(long, default_value = DEFAULT_IDS_FILE)]
    pub ids: PathBuf,

    /// Write results to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Maximum requests in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Retries for transient HTTP failures
    #[arg(long)]
    pub retries: Option<usize>,

    /// Minimum delay between requests in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl CrawlArgs {
    /// Environment configuration with command-line overrides applied.
    fn config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::from_env();
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.request_delay_ms = delay_ms;
        }
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }
}

pub async fn run(args: &CrawlArgs, format: &OutputFormat) -> Result<()> {
    let ids = read_municipality_ids(&args.ids)
        .with_context(|| format!("reading municipality ids from {}", args.ids.display()))?;
    if ids.is_empty() {
        eprintln!("No municipality ids found in {}", args.ids.display());
        return Ok(());
    }
    eprintln!("Crawling {} municipalities", ids.len());

    let crawler = Crawler::new(&args.config())?;
    let output = crawler.collect(ids).await;

    let rendered = render_records(&output.records, format)?;
    write_output(&rendered, args.out.as_deref())?;

    eprintln!("Crawl complete: {}", output.report);
    Ok(())
}
