//! Number/time normalization for raw feed fields.
//!
//! Nothing here fails: absent or unparsable numbers become `0`, absent or
//! unparsable times become "now".

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde_json::Value;

use crate::events::{RawTrade, Side, Trade};

/// Numeric value of a price/volume/percent field.
///
/// Accepts JSON numbers and text such as `"1,250"`, `"+2.5%"`, `"-0.8 %"`.
pub fn parse_number(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | '%' | '+') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Prices are never negative.
pub fn parse_price(raw: Option<&Value>) -> f64 {
    parse_number(raw).max(0.0)
}

/// Whole lots; fractional or negative input is floored at zero.
pub fn parse_volume(raw: Option<&Value>) -> u64 {
    let v = parse_number(raw);
    if v <= 0.0 {
        0
    } else {
        v.trunc() as u64
    }
}

pub fn parse_side(raw: Option<&Value>) -> Option<Side> {
    let text = raw?.as_str()?.trim().to_ascii_lowercase();
    match text.as_str() {
        "buy" | "b" => Some(Side::Buy),
        "sell" | "s" => Some(Side::Sell),
        _ => None,
    }
}

/// Non-empty trimmed text, with numbers rendered as-is.
pub fn parse_text(raw: Option<&Value>) -> Option<String> {
    let text = match raw? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Execution time in epoch millis.
///
/// Numbers (or all-digit strings) are epoch millis; `HH:MM:SS` resolves on
/// the calendar day of `now` in its offset. Anything else, including millis
/// outside the calendar range, is `now`.
pub fn parse_trade_time(raw: Option<&Value>, now: &DateTime<FixedOffset>) -> i64 {
    let fallback = now.timestamp_millis();

    let parsed = match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<i64>().ok()
            } else {
                clock_time_today(s, now)
            }
        }
        _ => None,
    };

    parsed.filter(|&ms| representable(ms)).unwrap_or(fallback)
}

/// Millis chrono can turn back into a date. Anything outside is junk input.
fn representable(ms: i64) -> bool {
    DateTime::<Utc>::from_timestamp_millis(ms).is_some()
}

fn clock_time_today(s: &str, now: &DateTime<FixedOffset>) -> Option<i64> {
    let mut parts = s.split(':');
    let hours = parts.next()?.trim().parse::<u32>().ok()?;
    let minutes = parts.next()?.trim().parse::<u32>().ok()?;
    let seconds = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let time = NaiveTime::from_hms_opt(hours, minutes, seconds)?;
    now.date_naive()
        .and_time(time)
        .and_local_timezone(*now.offset())
        .single()
        .map(|dt| dt.timestamp_millis())
}

/// Builds a [`Trade`] from a raw record. `None` only when there is no symbol.
pub fn normalize_trade(raw: &RawTrade, now: &DateTime<FixedOffset>) -> Option<Trade> {
    let symbol = parse_text(raw.symbol.as_ref())?;

    Some(Trade {
        symbol,
        side: parse_side(raw.action.as_ref()),
        price: parse_price(raw.price.as_ref()),
        volume: parse_volume(raw.volume.as_ref()),
        change_pct: parse_number(raw.change.as_ref()),
        board: parse_text(raw.board.as_ref()),
        time_ms: parse_trade_time(raw.time.as_ref(), now),
        reported_time: parse_text(raw.time.as_ref()),
    })
}
