//! Decoding of upstream running-trade payloads.
//!
//! Fetching is someone else's job; this module only turns a payload into
//! the `RawTrade` list the analyzer takes, plus a JSONL replay source.

use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::events::RawTrade;

/// Accepts a bare array, `{"data": [...]}` or `{"data": {"running_trade": [...]}}`.
pub fn parse_batch(payload: &str) -> Result<Vec<RawTrade>, FeedError> {
    let value: Value = serde_json::from_str(payload)?;
    extract_trades(value)
}

pub fn extract_trades(value: Value) -> Result<Vec<RawTrade>, FeedError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(mut inner)) => match inner.remove("running_trade") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(FeedError::Shape(format!(
                        "data.running_trade is {}",
                        type_name(&other)
                    )))
                }
            },
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(FeedError::Shape(format!("data is {}", type_name(&other))))
            }
        },
        other => return Err(FeedError::Shape(format!("payload is {}", type_name(&other)))),
    };

    let total = items.len();
    let trades: Vec<RawTrade> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if trades.len() < total {
        debug!("Skipped {} undecodable trade records", total - trades.len());
    }
    Ok(trades)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Replays recorded payloads, one batch per line.
pub struct ReplayFeed {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl ReplayFeed {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| FeedError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for ReplayFeed {
    type Item = Vec<RawTrade>;

    /// Next decodable batch. Blank and malformed lines are skipped.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    warn!("Replay read failed at {}: {}", self.path.display(), e);
                    return None;
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            match parse_batch(&line) {
                Ok(batch) => return Some(batch),
                Err(e) => warn!(
                    "Skipping replay line {} of {}: {}",
                    self.line_no,
                    self.path.display(),
                    e
                ),
            }
        }
    }
}
