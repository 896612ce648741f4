use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::constants::market::LOT_SIZE;

/// One running-trade record exactly as the upstream feed sent it.
///
/// Every field is a loose JSON value: prices arrive as `"1,250"` or `1250`,
/// times as epoch millis or `"09:15:02"`. `engine::normalize` turns this
/// into a [`Trade`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawTrade {
    #[serde(default, alias = "code")]
    pub symbol: Option<Value>,
    #[serde(default, alias = "side")]
    pub action: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default, alias = "lot")]
    pub volume: Option<Value>,
    #[serde(default)]
    pub change: Option<Value>,
    #[serde(default)]
    pub board: Option<Value>,
    #[serde(default)]
    pub time: Option<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Heuristic label: a non-negative change leans buy.
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct >= 0.0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized trade, valid for a single `analyze` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    pub symbol: String,
    /// Explicit side when the feed sent one
    pub side: Option<Side>,
    pub price: f64,
    /// Lots
    pub volume: u64,
    pub change_pct: f64,
    pub board: Option<String>,
    /// Execution time, epoch millis
    pub time_ms: i64,
    /// The time field as the feed rendered it; part of the dedup signature
    pub reported_time: Option<String>,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.volume as f64 * LOT_SIZE
    }

    pub fn effective_side(&self) -> Side {
        self.side.unwrap_or_else(|| Side::from_change(self.change_pct))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    Low,
    Moderate,
    Strong,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Low => "LOW",
            Strength::Moderate => "MODERATE",
            Strength::Strong => "STRONG",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeAlert {
    pub symbol: String,
    pub price: f64,
    pub side: Side,
    pub change_pct: f64,
    pub volume: u64,
    /// price x volume x lot size
    pub value: f64,
    pub category: Option<String>,
    pub time_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterAlert {
    pub symbol: String,
    /// Trades inside the window when the alert fired
    pub freq: usize,
    pub strength: Strength,
    pub side: Side,
    pub category: Option<String>,
    /// Price and notional of the trade that tipped the window
    pub price: f64,
    pub value: f64,
    pub time_ms: i64,
}

// Output of the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alert {
    Trade(TradeAlert),
    Cluster(ClusterAlert),
}

impl Alert {
    pub fn symbol(&self) -> &str {
        match self {
            Alert::Trade(a) => &a.symbol,
            Alert::Cluster(a) => &a.symbol,
        }
    }

    pub fn time_ms(&self) -> i64 {
        match self {
            Alert::Trade(a) => a.time_ms,
            Alert::Cluster(a) => a.time_ms,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Alert::Trade(_) => "TRADE",
            Alert::Cluster(_) => "CLUSTER",
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Alert::Cluster(_))
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::Trade(a) => write!(
                f,
                "[TRADE] {} {} {} lot @ {} ({:+.2}%) value={:.0}",
                a.symbol, a.side, a.volume, a.price, a.change_pct, a.value
            ),
            Alert::Cluster(a) => write!(
                f,
                "[CLUSTER {}] {} {} hits/window side={} @ {}",
                a.strength, a.symbol, a.freq, a.side, a.price
            ),
        }
    }
}
