//! Burst Radar - running-trade burst detection
//!
//! This library classifies batches of executed trades into trade notices and
//! "burst" alerts for symbols that trade abnormally often inside a short
//! window, along with the config, watchlist, feed and query plumbing the
//! binary wires around it.

pub mod alert_log;
pub mod api;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod feed;
pub mod watchlist;

// Re-export commonly used types
pub use alert_log::{AlertLog, AlertSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ClusterPolicy, DedupEviction, EngineConfig};
pub use engine::membership::{CategoryMap, Classification, Classify, IgnoreSet, MembershipState};
pub use engine::TradeAnalyzer;
pub use events::{Alert, ClusterAlert, RawTrade, Side, Strength, Trade, TradeAlert};

#[cfg(test)]
mod config_tests;
