use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{cluster, dedup, market, runtime};
use crate::error::ConfigError;

/// How the dedup cache makes room once it is full
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DedupEviction {
    /// Forget the oldest signature, one at a time
    #[default]
    Recency,
    /// Legacy mode: wipe every signature once the high-water mark is passed
    FullClear,
}

/// Cluster alert cadence
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClusterPolicy {
    /// MODERATE at the moderate threshold, STRONG at the strong threshold,
    /// then STRONG again every ten hits. The window is never reset.
    #[default]
    Escalating,
    /// One alert once `rearm_threshold` hits accumulate, then the window empties.
    Rearm,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistMode {
    /// Everything is eligible except the ignore folder
    #[default]
    Ignore,
    /// Only symbols listed in a category folder are eligible
    Category,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_window_ms")]
    pub cluster_window_ms: i64,
    #[serde(default = "default_min_freq_moderate")]
    pub min_freq_moderate: usize,
    #[serde(default = "default_min_freq_strong")]
    pub min_freq_strong: usize,
    #[serde(default = "default_max_lag_ms")]
    pub max_lag_ms: i64,
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
    #[serde(default)]
    pub dedup_eviction: DedupEviction,
    #[serde(default)]
    pub cluster_policy: ClusterPolicy,
    #[serde(default = "default_min_freq_moderate")]
    pub rearm_threshold: usize,
    /// `null` disables the board filter
    #[serde(default = "default_regular_board")]
    pub regular_board: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_window_ms: default_window_ms(),
            min_freq_moderate: default_min_freq_moderate(),
            min_freq_strong: default_min_freq_strong(),
            max_lag_ms: default_max_lag_ms(),
            dedup_capacity: default_dedup_capacity(),
            dedup_eviction: DedupEviction::default(),
            cluster_policy: ClusterPolicy::default(),
            rearm_threshold: default_min_freq_moderate(),
            regular_board: default_regular_board(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster_window_ms <= 0 {
            return Err(invalid("engine.cluster_window_ms", "must be positive"));
        }
        if self.max_lag_ms <= 0 {
            return Err(invalid("engine.max_lag_ms", "must be positive"));
        }
        if self.dedup_capacity == 0 {
            return Err(invalid("engine.dedup_capacity", "must be at least 1"));
        }
        if self.min_freq_moderate == 0 {
            return Err(invalid("engine.min_freq_moderate", "must be at least 1"));
        }
        if self.min_freq_strong <= self.min_freq_moderate {
            return Err(invalid(
                "engine.min_freq_strong",
                format!(
                    "must exceed min_freq_moderate ({})",
                    self.min_freq_moderate
                ),
            ));
        }
        if self.rearm_threshold == 0 {
            return Err(invalid("engine.rearm_threshold", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WatchlistConfig {
    #[serde(default)]
    pub mode: WatchlistMode,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_ignore_folder")]
    pub ignore_folder: String,
    /// Checked in order; the first folder listing a symbol names its category
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            mode: WatchlistMode::default(),
            data_dir: default_data_dir(),
            ignore_folder: default_ignore_folder(),
            categories: default_categories(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedConfig {
    pub replay_path: Option<PathBuf>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            replay_path: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_alert_history")]
    pub alert_history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            alert_history_limit: default_alert_history(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Reads `BURST_CONFIG` (or `config.yaml`) from disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(runtime::CONFIG_PATH_ENV)
            .unwrap_or_else(|_| runtime::DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        // serde_yaml maps an empty document to unit, not to an empty mapping
        let config: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.feed.poll_interval_ms == 0 {
            return Err(invalid("feed.poll_interval_ms", "must be positive"));
        }
        if self.server.alert_history_limit == 0 {
            return Err(invalid("server.alert_history_limit", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn default_window_ms() -> i64 {
    cluster::DEFAULT_WINDOW_MS
}

fn default_min_freq_moderate() -> usize {
    cluster::DEFAULT_MIN_FREQ_MODERATE
}

fn default_min_freq_strong() -> usize {
    cluster::DEFAULT_MIN_FREQ_STRONG
}

fn default_max_lag_ms() -> i64 {
    cluster::DEFAULT_MAX_LAG_MS
}

fn default_dedup_capacity() -> usize {
    dedup::DEFAULT_CAPACITY
}

fn default_regular_board() -> Option<String> {
    Some(market::REGULAR_BOARD.to_string())
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(runtime::DEFAULT_DATA_DIR)
}

fn default_ignore_folder() -> String {
    runtime::DEFAULT_IGNORE_FOLDER.to_string()
}

fn default_categories() -> Vec<String> {
    vec![
        "sleeping".to_string(),
        "penny".to_string(),
        "premium".to_string(),
    ]
}

fn default_poll_interval_ms() -> u64 {
    runtime::DEFAULT_POLL_INTERVAL_MS
}

fn default_bind_addr() -> String {
    runtime::DEFAULT_BIND_ADDR.to_string()
}

fn default_alert_history() -> usize {
    runtime::DEFAULT_ALERT_HISTORY
}
