mod commands;
mod output;
mod xml_output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "voit")]
#[command(about = "Harvest 2018 Flemish local election results from vlaanderenkiest.be")]
struct Cli {
    /// Output format: table, json, csv, markdown, xml
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Log debug output, including abandoned chains
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl candidate results for every municipality in the id file
    Crawl(commands::crawl::CrawlArgs),
    /// Print the party-list URL of every municipality without fetching it
    Urls(commands::urls::UrlsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("voit={}", level).parse()?)
                .add_directive("vlaanderenkiest_api=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Crawl(args) => commands::crawl::run(args, &format).await?,
        Commands::Urls(args) => commands::urls::run(args)?,
    }

    Ok(())
}
