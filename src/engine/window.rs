//! Per-symbol sliding windows and the burst detector built on them.

use std::collections::{HashMap, VecDeque};

use crate::config::{ClusterPolicy, EngineConfig};
use crate::constants::cluster::STRONG_REPEAT_EVERY;
use crate::events::Strength;

/// Recent trade timestamps of one symbol.
///
/// Invariant: entries are non-decreasing in insertion order and every entry
/// `t` satisfies `0 <= latest - t <= window_ms`, where `latest` is the last
/// inserted timestamp.
#[derive(Clone, Debug, Default)]
pub struct ClusterWindow {
    stamps: VecDeque<i64>,
}

impl ClusterWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `ts` and trims relative to it. Entries newer than `ts` (an
    /// out-of-order insert) are dropped along with entries that fell out of
    /// the window. Returns the resulting length.
    pub fn insert(&mut self, ts: i64, window_ms: i64) -> usize {
        self.stamps.push_back(ts);
        self.stamps.retain(|&t| {
            let delta = ts.saturating_sub(t);
            (0..=window_ms).contains(&delta)
        });
        self.stamps.len()
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn latest(&self) -> Option<i64> {
        self.stamps.back().copied()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.stamps.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn holds_invariant(&self, window_ms: i64) -> bool {
        let Some(latest) = self.latest() else {
            return true;
        };
        let ordered = self
            .stamps
            .iter()
            .zip(self.stamps.iter().skip(1))
            .all(|(a, b)| a <= b);
        ordered
            && self
                .stamps
                .iter()
                .all(|&t| (0..=window_ms).contains(&latest.saturating_sub(t)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterHit {
    pub freq: usize,
    pub strength: Strength,
}

#[derive(Debug)]
pub struct ClusterDetector {
    windows: HashMap<String, ClusterWindow>,
    window_ms: i64,
    max_lag_ms: i64,
    min_freq_moderate: usize,
    min_freq_strong: usize,
    policy: ClusterPolicy,
    rearm_threshold: usize,
}

impl ClusterDetector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            windows: HashMap::new(),
            window_ms: config.cluster_window_ms,
            max_lag_ms: config.max_lag_ms,
            min_freq_moderate: config.min_freq_moderate,
            min_freq_strong: config.min_freq_strong,
            policy: config.cluster_policy,
            rearm_threshold: config.rearm_threshold,
        }
    }

    pub fn is_fresh(&self, ts: i64, now_ms: i64) -> bool {
        now_ms.saturating_sub(ts) < self.max_lag_ms
    }

    /// Feeds one eligible, non-duplicate trade time. Stale times leave the
    /// window untouched. Returns the alert to raise, if any.
    pub fn observe(&mut self, symbol: &str, ts: i64, now_ms: i64) -> Option<ClusterHit> {
        if !self.is_fresh(ts, now_ms) {
            return None;
        }

        let window_ms = self.window_ms;
        let window = self.windows.entry(symbol.to_string()).or_default();
        let freq = window.insert(ts, window_ms);

        match self.policy {
            ClusterPolicy::Escalating => {
                let fires = freq == self.min_freq_moderate
                    || freq == self.min_freq_strong
                    || (freq > self.min_freq_strong && freq % STRONG_REPEAT_EVERY == 0);
                fires.then(|| ClusterHit {
                    freq,
                    strength: self.strength_for(freq),
                })
            }
            ClusterPolicy::Rearm => {
                if freq < self.rearm_threshold {
                    return None;
                }
                window.clear();
                Some(ClusterHit {
                    freq,
                    strength: self.strength_for(freq),
                })
            }
        }
    }

    pub fn strength_for(&self, freq: usize) -> Strength {
        if freq >= self.min_freq_strong {
            Strength::Strong
        } else if freq >= self.min_freq_moderate {
            Strength::Moderate
        } else {
            Strength::Low
        }
    }

    pub fn window(&self, symbol: &str) -> Option<&ClusterWindow> {
        self.windows.get(symbol)
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    pub fn tracked_symbols(&self) -> usize {
        self.windows.len()
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }
}
