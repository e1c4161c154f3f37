//! Per-run working directories and activity logs

use crate::activity_log::ActivityLog;
use crate::error::{Error, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Subdirectory holding unmerged downloads
pub const RAW_DIR_NAME: &str = "raw_downloads";
/// Subdirectory holding the activity logs
pub const LOGS_DIR_NAME: &str = "logs";
/// Download activity log file name
pub const DOWNLOAD_LOG_NAME: &str = "downloads.log";
/// Aggregation activity log file name
pub const AGGREGATION_LOG_NAME: &str = "aggregation.log";

/// Everything a single invocation writes to
///
/// Layout under the base directory:
///
/// ```text
/// <base>/dtb.<run-name>_<YYYYmmdd_HHMMSS>/
///     raw_downloads/
///     logs/downloads.log
///     logs/aggregation.log
///     combined_<run-name>.csv
/// ```
#[derive(Debug)]
pub struct RunContext {
    run_name: String,
    timestamp: String,
    output_dir: PathBuf,
    raw_dir: PathBuf,
    logs_dir: PathBuf,
    download_log: ActivityLog,
    aggregation_log: ActivityLog,
}

impl RunContext {
    /// Create the run folder for `run_name` stamped with the current local time
    pub fn create(base_dir: &Path, run_name: &str) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::create_with_timestamp(base_dir, run_name, &timestamp)
    }

    /// Create the run folder with an explicit timestamp
    ///
    /// Reusing a timestamp reuses the folder: existing raw files stay and the logs
    /// are appended to.
    pub fn create_with_timestamp(base_dir: &Path, run_name: &str, timestamp: &str) -> Result<Self> {
        let output_dir = base_dir.join(format!("dtb.{run_name}_{timestamp}"));
        let raw_dir = output_dir.join(RAW_DIR_NAME);
        let logs_dir = output_dir.join(LOGS_DIR_NAME);

        for dir in [base_dir, raw_dir.as_path(), logs_dir.as_path()] {
            std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let download_log = ActivityLog::open("DOWNLOAD", &logs_dir.join(DOWNLOAD_LOG_NAME))?;
        let aggregation_log =
            ActivityLog::open("AGGREGATE", &logs_dir.join(AGGREGATION_LOG_NAME))?;

        tracing::debug!(output_dir = %output_dir.display(), "run directories ready");

        Ok(Self {
            run_name: run_name.to_string(),
            timestamp: timestamp.to_string(),
            output_dir,
            raw_dir,
            logs_dir,
            download_log,
            aggregation_log,
        })
    }

    /// Operator-supplied run name
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Timestamp embedded in the run folder name
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The run folder
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where downloads land
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Where the activity logs live
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// File name of the merged output
    pub fn combined_file_name(&self) -> String {
        format!("combined_{}.csv", self.run_name)
    }

    /// Full path of the merged output
    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(self.combined_file_name())
    }

    /// Download activity log
    pub fn download_log(&self) -> &ActivityLog {
        &self.download_log
    }

    /// Aggregation activity log
    pub fn aggregation_log(&self) -> &ActivityLog {
        &self.aggregation_log
    }
}
