//! Watchlist / ignore-set classification.
//!
//! The two membership shapes answer different questions. An ignore-set is
//! opt-out: unknown symbols are eligible. A category map is opt-in: unknown
//! symbols are excluded.

use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Excluded,
    /// Eligible, with the watch category when the classifier has one
    Included(Option<String>),
}

impl Classification {
    pub fn is_excluded(&self) -> bool {
        matches!(self, Classification::Excluded)
    }
}

pub trait Classify {
    fn classify(&self, symbol: &str) -> Classification;
}

/// Known-noisy tickers to drop.
#[derive(Clone, Debug, Default)]
pub struct IgnoreSet {
    symbols: HashSet<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Classify for IgnoreSet {
    fn classify(&self, symbol: &str) -> Classification {
        if self.symbols.contains(symbol) {
            Classification::Excluded
        } else {
            Classification::Included(None)
        }
    }
}

/// Curated tickers grouped by label. Labels are checked in insertion order.
#[derive(Clone, Debug, Default)]
pub struct CategoryMap {
    categories: Vec<(String, HashSet<String>)>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `symbols` under `label`, merging if the label already exists.
    pub fn with_category<I, S>(mut self, label: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(label, symbols);
        self
    }

    pub fn insert<I, S>(&mut self, label: impl Into<String>, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        match self.categories.iter_mut().find(|entry| entry.0 == label) {
            Some((_, set)) => set.extend(symbols),
            None => self.categories.push((label, symbols.into_iter().collect())),
        }
    }

    /// (label, member count) in lookup order
    pub fn sizes(&self) -> Vec<(&str, usize)> {
        self.categories
            .iter()
            .map(|(label, set)| (label.as_str(), set.len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|(_, set)| set.len()).sum()
    }
}

impl Classify for CategoryMap {
    fn classify(&self, symbol: &str) -> Classification {
        self.categories
            .iter()
            .find(|(_, set)| set.contains(symbol))
            .map(|(label, _)| Classification::Included(Some(label.clone())))
            .unwrap_or(Classification::Excluded)
    }
}

/// Membership supplied by the caller for one `analyze` call.
#[derive(Clone, Debug)]
pub enum MembershipState {
    Ignore(IgnoreSet),
    Categories(CategoryMap),
}

impl Default for MembershipState {
    fn default() -> Self {
        MembershipState::Ignore(IgnoreSet::default())
    }
}

impl Classify for MembershipState {
    fn classify(&self, symbol: &str) -> Classification {
        match self {
            MembershipState::Ignore(set) => set.classify(symbol),
            MembershipState::Categories(map) => map.classify(symbol),
        }
    }
}

/// Board gate: with a configured regular board, a trade that names a
/// different board is not a comparable burst signal. Trades without a board
/// code pass.
pub fn passes_board_filter(board: Option<&str>, regular_board: Option<&str>) -> bool {
    match (board, regular_board) {
        (Some(board), Some(regular)) => board.eq_ignore_ascii_case(regular),
        _ => true,
    }
}
