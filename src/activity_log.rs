//! Append-only activity logs
//!
//! A run keeps two independent logs (downloads and aggregation). Each one is an
//! [`ActivityLog`] handed to the components that write to it; nothing here touches
//! process-wide logger state. Lines are written verbatim, one per call, and mirrored
//! to `tracing` so they also show up in console diagnostics.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// A single append-only log file
pub struct ActivityLog {
    name: &'static str,
    path: PathBuf,
    writer: Mutex<RollingFileAppender>,
}

impl ActivityLog {
    /// Open (or create) the log file at `path` in append mode
    ///
    /// `name` tags the mirrored `tracing` events, e.g. "DOWNLOAD" or "AGGREGATE".
    /// The parent directory must already exist.
    pub fn open(name: &'static str, path: &Path) -> Result<Self> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Config {
                message: format!("invalid log file path {}", path.display()),
                key: None,
            })?;

        let writer = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to open log {}: {}",
                    path.display(),
                    e
                )))
            })?;

        Ok(Self {
            name,
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an informational line
    pub fn info(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::info!(log = self.name, "{}", line);
        self.append(line);
    }

    /// Append an error line
    pub fn error(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        tracing::error!(log = self.name, "{}", line);
        self.append(line);
    }

    fn append(&self, line: &str) {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let result = writer
            .write_all(format!("{line}\n").as_bytes())
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            // A broken activity log must not take the run down with it
            tracing::warn!(
                log = self.name,
                path = %self.path.display(),
                error = %e,
                "failed to append to activity log"
            );
        }
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
