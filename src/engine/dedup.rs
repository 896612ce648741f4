use std::collections::{HashSet, VecDeque};
use std::fmt;

use crate::config::DedupEviction;
use crate::events::Trade;

/// Deterministic key of one trade occurrence: symbol, reported time,
/// volume and price.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn of(trade: &Trade) -> Self {
        Signature(format!(
            "{}_{}_{}_{}",
            trade.symbol,
            trade.reported_time.as_deref().unwrap_or("-"),
            trade.volume,
            trade.price
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded set of recently processed signatures.
///
/// `Recency` evicts the oldest signature once `capacity` is exceeded.
/// `FullClear` wipes the whole cache instead, so right after a wipe an
/// old trade can be alerted again.
#[derive(Debug)]
pub struct DedupCache {
    seen: HashSet<Signature>,
    /// Insertion order, only maintained in `Recency` mode
    order: VecDeque<Signature>,
    capacity: usize,
    eviction: DedupEviction,
}

impl DedupCache {
    pub fn new(capacity: usize, eviction: DedupEviction) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            capacity,
            eviction,
        }
    }

    pub fn seen(&self, signature: &Signature) -> bool {
        self.seen.contains(signature)
    }

    pub fn record(&mut self, signature: Signature) {
        match self.eviction {
            DedupEviction::FullClear => {
                self.seen.insert(signature);
                if self.seen.len() > self.capacity {
                    self.seen.clear();
                }
            }
            DedupEviction::Recency => {
                if !self.seen.insert(signature.clone()) {
                    return;
                }
                self.order.push_back(signature);
                while self.order.len() > self.capacity {
                    if let Some(oldest) = self.order.pop_front() {
                        self.seen.remove(&oldest);
                    }
                }
            }
        }
    }

    /// Records `signature` and reports whether it was already resident.
    pub fn check_and_record(&mut self, signature: Signature) -> bool {
        if self.seen(&signature) {
            return true;
        }
        self.record(signature);
        false
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}
