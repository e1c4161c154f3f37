//! Run driver: extract, download, aggregate
//!
//! Stages run strictly in order (`Init → Extracting → Downloading →
//! Aggregating → Done`) on the calling task, one link at a time. Only setup
//! failures are returned as errors; per-link and per-file problems end up in
//! the run's activity logs.

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::error::Result;
use crate::extractor::LinkExtractor;
use crate::fetcher::Fetcher;
use crate::run_context::RunContext;
use crate::types::{FetchOutcome, RunSummary, Stage};
use std::path::{Path, PathBuf};
use tracing::info;

/// Drives one email through the whole pipeline
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline after validating `config`
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Set up a fresh run folder under the configured base directory
    pub fn init(&self, run_name: &str) -> Result<RunContext> {
        info!(stage = %Stage::Init, run_name, "preparing run directories");
        RunContext::create(&self.config.output.base_dir, run_name)
    }

    /// Create a run folder and process `email` in it
    pub async fn run(&self, email: &Path, run_name: &str) -> Result<RunSummary> {
        let ctx = self.init(run_name)?;
        self.run_in(&ctx, email).await
    }

    /// Process `email` inside an existing run folder
    pub async fn run_in(&self, ctx: &RunContext, email: &Path) -> Result<RunSummary> {
        info!(stage = %Stage::Extracting, email = %email.display(), "parsing email");
        let extractor = LinkExtractor::new(ctx.download_log())?;
        let links = extractor.extract(email);

        if links.is_empty() {
            info!("No .csv URLs found in email.");
            return Ok(RunSummary {
                links_found: 0,
                files_downloaded: 0,
                aggregate: None,
                stage: Stage::Extracting,
            });
        }
        info!("Found {} .csv URLs in email.", links.len());

        info!(stage = %Stage::Downloading, links = links.len(), "downloading");
        let fetcher = Fetcher::new(&self.config.fetch, ctx.raw_dir(), ctx.download_log())?;
        let mut downloaded: Vec<PathBuf> = Vec::new();
        for link in &links {
            if let FetchOutcome::Downloaded { path } = fetcher.fetch(link).await {
                downloaded.push(path);
            }
        }
        info!("Downloaded {} out of {} files.", downloaded.len(), links.len());

        info!(stage = %Stage::Aggregating, raw_dir = %ctx.raw_dir().display(), "aggregating");
        let aggregator = Aggregator::new(&self.config.merge, ctx.aggregation_log());
        let report = aggregator.aggregate(ctx.raw_dir(), &ctx.combined_path());

        info!(
            stage = %Stage::Done,
            links = links.len(),
            downloaded = downloaded.len(),
            rows = report.total_rows,
            "run complete"
        );

        Ok(RunSummary {
            links_found: links.len(),
            files_downloaded: downloaded.len(),
            aggregate: Some(report),
            stage: Stage::Done,
        })
    }
}
