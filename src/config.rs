//! Configuration types for ticket-csv

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Main configuration for a run
///
/// Every field has a default, so an empty JSON object (or no file at all) yields the
/// stock behavior: output under `./output`, three attempts per link with a fixed
/// two-second pause, and merge order following directory enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where run folders are created
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP fetching behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// CSV merge behavior
    #[serde(default)]
    pub merge: MergeConfig,
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// Missing keys fall back to their defaults. The result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.fetch.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "at least one download attempt is required".into(),
                key: Some("fetch.retry.max_attempts".into()),
            });
        }
        if self.fetch.retry.backoff_multiplier <= 0.0 {
            return Err(Error::Config {
                message: "backoff multiplier must be positive".into(),
                key: Some("fetch.retry.backoff_multiplier".into()),
            });
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(Error::Config {
                message: "user agent must not be empty".into(),
                key: Some("fetch.user_agent".into()),
            });
        }
        if self.merge.sniff_sample_bytes == 0 {
            return Err(Error::Config {
                message: "header sniffing needs a non-empty sample".into(),
                key: Some("merge.sniff_sample_bytes".into()),
            });
        }
        Ok(())
    }
}

/// Output location settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory for run folders (default: "./output")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

/// HTTP fetch settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request (default: "TicketCSV-Downloader/1.0")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-attempt request timeout (default: 10 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Retry behavior for failed attempts
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration
///
/// The defaults describe a fixed linear backoff: the multiplier is 1.0 and the cap
/// equals the initial delay, so every pause between attempts is the same length.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 2 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 2 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_retry_delay(),
            max_delay: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Order in which downloaded files are merged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    /// Whatever order the filesystem lists the raw directory in (default)
    #[default]
    Directory,
    /// Sorted by file name
    Name,
}

/// CSV merge settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MergeConfig {
    /// File ordering for the merge
    #[serde(default)]
    pub order: MergeOrder,

    /// Number of leading bytes inspected for header detection (default: 1024)
    #[serde(default = "default_sniff_sample_bytes")]
    pub sniff_sample_bytes: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            order: MergeOrder::default(),
            sniff_sample_bytes: default_sniff_sample_bytes(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_user_agent() -> String {
    "TicketCSV-Downloader/1.0".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_sniff_sample_bytes() -> usize {
    1024
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
