//! Core types for ticket-csv

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A hyperlink target found in the message body
///
/// Identity is the exact string; the same URL appearing twice yields two links.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Link(pub String);

impl Link {
    /// Create a new Link
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Link {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

impl From<String> for Link {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl PartialEq<&str> for Link {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of fetching one link
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The payload was written to `path`
    Downloaded {
        /// Local file holding the payload
        path: PathBuf,
    },
    /// Every attempt failed
    Failed {
        /// Human-readable reason from the last attempt
        reason: String,
    },
}

impl FetchOutcome {
    /// Local path on success
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            FetchOutcome::Downloaded { path } => Some(path),
            FetchOutcome::Failed { .. } => None,
        }
    }

    /// Whether the link was downloaded
    pub fn is_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

/// Summary of one aggregation pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Combined file, present only if something was written
    pub output: Option<PathBuf>,
    /// Files that contributed rows
    pub files_added: usize,
    /// Empty files that were skipped
    pub files_skipped: usize,
    /// Files that could not be read
    pub files_failed: usize,
    /// Rows in the combined file (data rows plus the header), 0 if nothing was written
    pub total_rows: usize,
}

/// Pipeline stage, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Directories and logs are being set up
    Init,
    /// Links are being pulled out of the message
    Extracting,
    /// Links are being fetched one by one
    Downloading,
    /// Raw files are being merged
    Aggregating,
    /// The run finished
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Extracting => "extracting",
            Stage::Downloading => "downloading",
            Stage::Aggregating => "aggregating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a run did, reported back to the operator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Links found in the message
    pub links_found: usize,
    /// Links successfully downloaded in this run
    pub files_downloaded: usize,
    /// Aggregation result, absent when the run stopped after extraction
    pub aggregate: Option<AggregateReport>,
    /// Last stage reached
    pub stage: Stage,
}
