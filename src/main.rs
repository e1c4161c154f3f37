//! ticket-csv CLI - download and merge the CSV files linked from an email
//!
//! Usage:
//!   ticket-csv --email emails/tickets.eml --name JulyCampaign [--output-dir ./output]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

use ticket_csv::{Config, MergeOrder, Pipeline};

#[derive(Parser)]
#[command(name = "ticket-csv")]
#[command(about = "Download and aggregate CSVs from hyperlinks in a .eml email")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the .eml file (e.g., emails/alert.eml)
    #[arg(long)]
    email: PathBuf,

    /// Custom name for output (e.g., JulyCampaign)
    #[arg(long)]
    name: String,

    /// Base directory for run folders
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Merge downloaded files in name order instead of directory order
    #[arg(long)]
    sort_inputs: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output.base_dir = dir;
    }
    if cli.sort_inputs {
        config.merge.order = MergeOrder::Name;
    }

    let pipeline = Pipeline::new(config)?;
    let ctx = pipeline.init(&cli.name).map_err(|e| {
        error!(code = e.error_code(), "{}", e);
        e
    })?;

    println!("Parsing email: {}", cli.email.display());
    println!("Output folder: {}", ctx.output_dir().display());

    let summary = pipeline.run_in(&ctx, &cli.email).await?;

    if summary.links_found == 0 {
        println!("No .csv URLs found in email.");
        return Ok(());
    }

    println!(
        "Downloaded {} out of {} files.",
        summary.files_downloaded, summary.links_found
    );

    match summary.aggregate.as_ref().and_then(|r| r.output.as_ref()) {
        Some(path) => println!("Aggregation complete: {}", path.display()),
        None => println!("No combined file was created."),
    }
    println!("Process complete. Check logs in: {}", ctx.logs_dir().display());

    Ok(())
}
