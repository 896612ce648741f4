//! Application-wide constants and magic numbers
//!
//! This module centralizes the hardcoded values of the burst engine so the
//! defaults in `config` and the arithmetic in `engine` agree.

/// Market conventions
pub mod market {
    /// Shares per lot. Notional value is price x lots x LOT_SIZE.
    pub const LOT_SIZE: f64 = 100.0;

    /// Board code of the continuous-auction market
    pub const REGULAR_BOARD: &str = "RG";
}

/// Cluster detector defaults
pub mod cluster {
    /// Rolling window length (ms)
    pub const DEFAULT_WINDOW_MS: i64 = 1_000;

    /// Hits inside the window that raise a MODERATE alert
    pub const DEFAULT_MIN_FREQ_MODERATE: usize = 3;

    /// Hits inside the window that raise the first STRONG alert
    pub const DEFAULT_MIN_FREQ_STRONG: usize = 10;

    /// Past the strong threshold, re-alert every this many hits
    pub const STRONG_REPEAT_EVERY: usize = 10;

    /// Trades older than this (relative to now) never enter a window
    pub const DEFAULT_MAX_LAG_MS: i64 = 30_000;
}

/// Deduplication defaults
pub mod dedup {
    /// High-water mark for resident signatures
    pub const DEFAULT_CAPACITY: usize = 5_000;
}

/// Plumbing defaults (feed, server, watchlists)
pub mod runtime {
    pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
    pub const CONFIG_PATH_ENV: &str = "BURST_CONFIG";
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
    pub const DEFAULT_ALERT_HISTORY: usize = 500;
    pub const DEFAULT_DATA_DIR: &str = "data";
    pub const DEFAULT_IGNORE_FOLDER: &str = "ignore";

    /// Shortest symbol accepted from a watchlist file
    pub const MIN_SYMBOL_LEN: usize = 4;
}
