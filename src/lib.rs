//! # ticket-csv
//!
//! Download the CSV files linked from an email and merge them into one file.
//!
//! ## Pipeline
//!
//! 1. [`extractor`] reads the `.eml` file and collects every `<a href>` target
//!    whose path ends in `.csv`
//! 2. [`fetcher`] downloads each link in turn, retrying failed attempts
//! 3. [`aggregator`] merges the downloaded files under a single header row
//!
//! Each run writes into its own folder with two append-only activity logs:
//!
//! ```text
//! <base>/dtb.<run-name>_<timestamp>/
//!     raw_downloads/
//!     logs/downloads.log
//!     logs/aggregation.log
//!     combined_<run-name>.csv
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use ticket_csv::{Config, Pipeline};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Config::default())?;
//!     let summary = pipeline.run(Path::new("emails/tickets.eml"), "JulyCampaign").await?;
//!
//!     println!(
//!         "downloaded {} of {} files",
//!         summary.files_downloaded, summary.links_found
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Append-only activity logs
pub mod activity_log;
/// CSV merging
pub mod aggregator;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Link extraction from email messages
pub mod extractor;
/// HTTP download with retry
pub mod fetcher;
/// Run driver
pub mod pipeline;
/// Retry logic with configurable backoff
pub mod retry;
/// Per-run directories and logs
pub mod run_context;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use activity_log::ActivityLog;
pub use aggregator::Aggregator;
pub use config::{Config, FetchConfig, MergeConfig, MergeOrder, OutputConfig, RetryConfig};
pub use error::{AggregateError, Error, FetchError, Result};
pub use extractor::LinkExtractor;
pub use fetcher::Fetcher;
pub use pipeline::Pipeline;
pub use run_context::RunContext;
pub use types::{AggregateReport, FetchOutcome, Link, RunSummary, Stage};
