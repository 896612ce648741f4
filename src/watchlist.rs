//! Folder-based watchlists.
//!
//! Each folder under `data_dir` holds CSV exports (one ticker per line,
//! first column). Ignore mode reads one folder; category mode reads one
//! folder per category, in configured order.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{WatchlistConfig, WatchlistMode};
use crate::constants::runtime::MIN_SYMBOL_LEN;
use crate::engine::membership::{CategoryMap, IgnoreSet, MembershipState};
use crate::error::WatchlistError;

/// Ticker from one CSV line: `"IDX:BBCA.JK",...` -> `BBCA`.
pub fn clean_symbol(line: &str) -> Option<String> {
    let first = line.split(',').next()?;
    let symbol = first
        .replace(['"', '\''], "")
        .replace("IDX:", "")
        .replace(".JK", "");
    let symbol = symbol.trim();

    let valid = symbol.len() >= MIN_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    valid.then(|| symbol.to_string())
}

/// Unique tickers across every non-hidden file in `dir`. A missing folder
/// is an empty watchlist.
pub fn load_folder(dir: &Path) -> Result<BTreeSet<String>, WatchlistError> {
    let io_err = |source: std::io::Error| WatchlistError::Io {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.exists() {
        warn!("Watchlist folder {} not found, treating as empty", dir.display());
        return Ok(BTreeSet::new());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.starts_with('.'))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut symbols = BTreeSet::new();
    for path in &paths {
        let content = fs::read_to_string(path).map_err(|source| WatchlistError::Io {
            path: path.clone(),
            source,
        })?;
        symbols.extend(
            content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .filter_map(clean_symbol),
        );
    }

    info!(
        "Scanned {} ({} files, {} tickers)",
        dir.display(),
        paths.len(),
        symbols.len()
    );
    Ok(symbols)
}

pub fn load_membership(config: &WatchlistConfig) -> Result<MembershipState, WatchlistError> {
    match config.mode {
        WatchlistMode::Ignore => {
            let symbols = load_folder(&config.data_dir.join(&config.ignore_folder))?;
            info!("Ignore list loaded: {} tickers", symbols.len());
            Ok(MembershipState::Ignore(IgnoreSet::new(symbols)))
        }
        WatchlistMode::Category => {
            let mut map = CategoryMap::new();
            for label in &config.categories {
                let symbols = load_folder(&config.data_dir.join(label))?;
                info!("[{}] {} tickers", label, symbols.len());
                map.insert(label.clone(), symbols);
            }
            if map.total() == 0 {
                warn!("No tickers in any category folder; every trade will be excluded");
            }
            Ok(MembershipState::Categories(map))
        }
    }
}
