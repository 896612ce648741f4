//! Trade classification and burst detection.
//!
//! [`TradeAnalyzer`] owns the dedup cache and the per-symbol cluster windows.
//! Each `analyze` call runs a batch through normalize -> classify -> dedup ->
//! detect -> build and returns alerts in input order. The analyzer does no
//! I/O and no locking; callers serialize access (the API wraps it in a
//! mutex).

pub mod dedup;
pub mod membership;
pub mod normalize;
pub mod window;

#[cfg(test)]
mod normalize_tests;

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::events::{Alert, ClusterAlert, RawTrade, Trade, TradeAlert};

use dedup::{DedupCache, Signature};
use membership::{passes_board_filter, Classification, Classify};
use window::{ClusterDetector, ClusterHit, ClusterWindow};

pub struct TradeAnalyzer<C = SystemClock> {
    config: EngineConfig,
    dedup: DedupCache,
    detector: ClusterDetector,
    clock: C,
}

impl TradeAnalyzer<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TradeAnalyzer<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self {
            dedup: DedupCache::new(config.dedup_capacity, config.dedup_eviction),
            detector: ClusterDetector::new(&config),
            config,
            clock,
        }
    }

    /// Turns one upstream batch into alerts.
    ///
    /// Each eligible, first-seen trade yields a `Trade` alert, followed
    /// directly by a `Cluster` alert when it tipped its symbol's window.
    pub fn analyze<M>(&mut self, batch: &[RawTrade], membership: &M) -> Vec<Alert>
    where
        M: Classify + ?Sized,
    {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        let mut alerts = Vec::new();

        for raw in batch {
            let Some(trade) = normalize::normalize_trade(raw, &now) else {
                trace!("Dropping trade without symbol");
                continue;
            };

            let category = match membership.classify(&trade.symbol) {
                Classification::Excluded => {
                    trace!(symbol = %trade.symbol, "Not eligible");
                    continue;
                }
                Classification::Included(category) => category,
            };

            if !passes_board_filter(trade.board.as_deref(), self.config.regular_board.as_deref())
            {
                trace!(symbol = %trade.symbol, board = ?trade.board, "Off-board print skipped");
                continue;
            }

            let signature = Signature::of(&trade);
            if self.dedup.check_and_record(signature) {
                trace!(symbol = %trade.symbol, "Duplicate trade skipped");
                continue;
            }

            let hit = self.detector.observe(&trade.symbol, trade.time_ms, now_ms);

            alerts.push(Alert::Trade(build_trade_alert(&trade, category.clone())));
            if let Some(hit) = hit {
                debug!(
                    symbol = %trade.symbol,
                    freq = hit.freq,
                    strength = %hit.strength,
                    "Cluster detected"
                );
                alerts.push(Alert::Cluster(build_cluster_alert(&trade, category, hit)));
            }
        }

        debug!(
            batch = batch.len(),
            alerts = alerts.len(),
            resident = self.dedup.len(),
            "Batch analyzed"
        );
        alerts
    }

    /// Forgets every seen signature and every cluster window.
    pub fn reset(&mut self) {
        self.dedup.clear();
        self.detector.clear();
        debug!("Analyzer state reset");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn window(&self, symbol: &str) -> Option<&ClusterWindow> {
        self.detector.window(symbol)
    }

    pub fn resident_signatures(&self) -> usize {
        self.dedup.len()
    }

    pub fn tracked_symbols(&self) -> usize {
        self.detector.tracked_symbols()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

fn build_trade_alert(trade: &Trade, category: Option<String>) -> TradeAlert {
    TradeAlert {
        symbol: trade.symbol.clone(),
        price: trade.price,
        side: trade.effective_side(),
        change_pct: trade.change_pct,
        volume: trade.volume,
        value: trade.notional(),
        category,
        time_ms: trade.time_ms,
    }
}

fn build_cluster_alert(trade: &Trade, category: Option<String>, hit: ClusterHit) -> ClusterAlert {
    ClusterAlert {
        symbol: trade.symbol.clone(),
        freq: hit.freq,
        strength: hit.strength,
        side: trade.effective_side(),
        category,
        price: trade.price,
        value: trade.notional(),
        time_ms: trade.time_ms,
    }
}
