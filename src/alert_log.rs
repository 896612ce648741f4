use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::events::{Alert, Strength};

pub const CSV_HEADER: &str = "type,symbol,time_ms,side,price,volume,value,freq,strength,category";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlertSummary {
    pub trade_alerts: u64,
    pub cluster_alerts: u64,

    /// Cluster alerts per strength tier
    pub per_strength: BTreeMap<Strength, u64>,

    /// Trade alerts per symbol
    pub per_symbol: BTreeMap<String, u64>,

    /// Sum of trade-alert notional values
    pub total_value: f64,

    pub last_alert_ms: Option<i64>,
}

struct LogState {
    recent: VecDeque<Alert>,
    summary: AlertSummary,
}

/// Recent alerts for the query surface. Keeps the newest `limit` alerts;
/// the summary counts everything since the last clear.
#[derive(Clone)]
pub struct AlertLog {
    state: Arc<Mutex<LogState>>,
    limit: usize,
}

impl AlertLog {
    pub fn new(limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LogState {
                recent: VecDeque::with_capacity(limit),
                summary: AlertSummary::default(),
            })),
            limit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, alerts: &[Alert]) {
        let mut state = self.lock();
        for alert in alerts {
            let s = &mut state.summary;
            match alert {
                Alert::Trade(t) => {
                    s.trade_alerts += 1;
                    s.total_value += t.value;
                    *s.per_symbol.entry(t.symbol.clone()).or_insert(0) += 1;
                }
                Alert::Cluster(c) => {
                    s.cluster_alerts += 1;
                    *s.per_strength.entry(c.strength).or_insert(0) += 1;
                }
            }
            s.last_alert_ms = Some(alert.time_ms());

            if state.recent.len() >= self.limit {
                state.recent.pop_front();
            }
            state.recent.push_back(alert.clone());
        }
    }

    /// Newest first, at most `limit` (all retained when `None`).
    pub fn recent(&self, limit: Option<usize>) -> Vec<Alert> {
        let state = self.lock();
        let take = limit.unwrap_or(state.recent.len());
        state.recent.iter().rev().take(take).cloned().collect()
    }

    pub fn summary(&self) -> AlertSummary {
        self.lock().summary.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().recent.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.recent.clear();
        state.summary = AlertSummary::default();
    }

    /// Retained alerts, oldest first, one row each.
    pub fn to_csv(&self) -> String {
        let state = self.lock();
        let mut out = String::from(CSV_HEADER);
        out.push('\n');

        for alert in &state.recent {
            let _ = match alert {
                Alert::Trade(t) => writeln!(
                    out,
                    "TRADE,{},{},{},{},{},{},,,{}",
                    csv_field(&t.symbol),
                    t.time_ms,
                    t.side,
                    t.price,
                    t.volume,
                    t.value,
                    csv_field(t.category.as_deref().unwrap_or(""))
                ),
                Alert::Cluster(c) => writeln!(
                    out,
                    "CLUSTER,{},{},{},{},,{},{},{},{}",
                    csv_field(&c.symbol),
                    c.time_ms,
                    c.side,
                    c.price,
                    c.value,
                    c.freq,
                    c.strength,
                    csv_field(c.category.as_deref().unwrap_or(""))
                ),
            };
        }
        out
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
