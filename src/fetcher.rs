//! Retrying HTTP fetcher for linked CSV files
//!
//! Each link gets up to `retry.max_attempts` GET requests. The first 2xx
//! response is written to the raw directory in one shot. Exactly one line per
//! link reaches the download log, whatever the number of attempts.

use crate::activity_log::ActivityLog;
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::retry::download_with_retry;
use crate::types::{FetchOutcome, Link};
use crate::utils::local_filename;
use std::path::{Path, PathBuf};

/// Downloads links into a directory
pub struct Fetcher<'a> {
    client: reqwest::Client,
    config: FetchConfig,
    raw_dir: PathBuf,
    log: &'a ActivityLog,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher writing into `raw_dir` and reporting to `log`
    pub fn new(config: &FetchConfig, raw_dir: &Path, log: &'a ActivityLog) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            config: config.clone(),
            raw_dir: raw_dir.to_path_buf(),
            log,
        })
    }

    /// Download one link, retrying on any failure until the attempt budget is spent
    pub async fn fetch(&self, link: &Link) -> FetchOutcome {
        let filename = local_filename(link.as_str());
        let path = self.raw_dir.join(&filename);
        let target = path.as_path();

        let result = download_with_retry(&self.config.retry, |attempt| {
            self.attempt(link.as_str(), target, attempt)
        })
        .await;

        match result {
            Ok(bytes) => {
                tracing::debug!(url = %link, file = %filename, bytes, "download complete");
                self.log
                    .info(format!("DOWNLOAD: {link} -> {filename} - SUCCESS"));
                FetchOutcome::Downloaded { path }
            }
            Err(e) => {
                let reason = e.to_string();
                self.log
                    .error(format!("DOWNLOAD: {link} -> {filename} - FAILED ({reason})"));
                FetchOutcome::Failed { reason }
            }
        }
    }

    /// One request: fetch, check status, write the whole body
    async fn attempt(
        &self,
        url: &str,
        target: &Path,
        attempt: u32,
    ) -> std::result::Result<usize, FetchError> {
        let parsed =
            url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(url, attempt, "requesting");
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        tokio::fs::write(target, &body).await?;
        Ok(body.len())
    }
}
