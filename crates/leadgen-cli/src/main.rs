mod render;
mod search;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use leadgen_pipeline::{GeminiLeadService, Orchestrator};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadgen")]
#[command(about = "Discover local businesses and enrich them with contact details")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover businesses for an industry and location
    Search {
        /// Kind of business to look for (e.g., "bakeries")
        #[arg(long)]
        industry: String,
        /// City, region or area to search in
        #[arg(long)]
        location: String,
        /// Enrich every discovered lead after the search
        #[arg(long)]
        enrich_all: bool,
        /// Retry each failed lead once after enrichment
        #[arg(long)]
        retry_failed: bool,
        /// Write the results to a CSV file
        #[arg(long)]
        export: bool,
        /// Directory the CSV export is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the loaded configuration (credentials redacted)
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = leadgen_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search {
            industry,
            location,
            enrich_all,
            retry_failed,
            export,
            out_dir,
        }) => {
            let service = GeminiLeadService::from_config(&config)
                .map_err(|e| anyhow::anyhow!("failed to build Gemini client: {e}"))?;
            let orchestrator = Orchestrator::new(Arc::new(service), config.enrich_batch_size);
            let options = search::SearchOptions {
                enrich_all,
                retry_failed,
                export,
                out_dir,
            };
            search::run_search(&orchestrator, &industry, &location, &options).await?;
        }
        Some(Commands::Config) => println!("{config:#?}"),
        None => println!("nothing to do; try `leadgen search --help`"),
    }

    Ok(())
}
