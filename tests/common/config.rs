//! Test configuration helpers

use std::path::Path;
use std::time::Duration;
use ticket_csv::{Config, MergeOrder, RetryConfig};

/// Configuration rooted in `base_dir` with millisecond retry delays and name-ordered merges
pub fn fast_config(base_dir: &Path) -> Config {
    let mut config = Config::default();
    config.output.base_dir = base_dir.to_path_buf();
    config.fetch.timeout = Duration::from_secs(5);
    config.fetch.retry = RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(10),
        backoff_multiplier: 1.0,
        jitter: false,
    };
    config.merge.order = MergeOrder::Name;
    config
}
