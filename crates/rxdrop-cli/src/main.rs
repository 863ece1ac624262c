mod extract;
mod lookup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rxdrop")]
#[command(about = "Find pharmaceutical disposal sites near a ZIP code")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract disposal sites from a saved results page
    Extract {
        /// Path to the results page HTML
        file: PathBuf,
        /// Resolve relative map links against this URL
        #[arg(long)]
        base_url: Option<url::Url>,
        /// Print the strategy used and any fallbacks alongside the records
        #[arg(long)]
        report: bool,
    },
    /// Look up disposal sites through the configured rendering service
    Lookup {
        /// 5-digit ZIP code (ZIP+4 accepted)
        #[arg(long)]
        zip: String,
        /// Search radius in miles: 5, 10, 20 or 50
        #[arg(long)]
        radius: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(rxdrop_core::load_log_level()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli).await
}

/// Dispatch a parsed command. Only `lookup` reads the full configuration.
async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Extract {
            file,
            base_url,
            report,
        }) => extract::run_extract(&file, base_url, report)?,
        Some(Commands::Lookup { zip, radius }) => {
            let config = rxdrop_core::load_app_config()?;
            lookup::run_lookup(&config, &zip, radius.as_deref()).await?;
        }
        None => {
            println!("usage: rxdrop extract <FILE> | rxdrop lookup --zip <ZIP> [--radius <MILES>]");
        }
    }

    Ok(())
}
