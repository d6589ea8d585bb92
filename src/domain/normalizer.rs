//! Raw candle normalization.
//!
//! Candle providers hand back loosely-typed JSON objects. Numeric fields may
//! arrive as floats, integers or strings, and any field may be missing. A
//! single malformed bar never aborts the series: unusable numbers become 0 and
//! an unusable timestamp becomes the current time.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::candle::{Candle, Series};

/// One candle as delivered by a provider.
pub type RawCandle = Map<String, Value>;

const TIMESTAMP_KEYS: [&str; 3] = ["begin", "timestamp", "date"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Read a numeric field, accepting floats, integers and numeric strings.
pub fn parse_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn parse_timestamp(value: Option<&Value>) -> Option<NaiveDateTime> {
    let s = value?.as_str()?.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn field<'a>(raw: &'a RawCandle, key: &str) -> Option<&'a Value> {
    raw.get(key)
}

/// Convert one raw candle. Returns the candle and whether its timestamp parsed.
pub fn normalize_candle(raw: &RawCandle, now: NaiveDateTime) -> (Candle, bool) {
    let timestamp = TIMESTAMP_KEYS
        .iter()
        .find_map(|key| parse_timestamp(field(raw, key)));

    let candle = Candle {
        timestamp: timestamp.unwrap_or(now),
        high: parse_number(field(raw, "high")).unwrap_or(0.0),
        low: parse_number(field(raw, "low")).unwrap_or(0.0),
        close: parse_number(field(raw, "close")).unwrap_or(0.0),
        volume: parse_number(field(raw, "volume")).unwrap_or(0.0),
    };
    (candle, timestamp.is_some())
}

/// Normalize a raw candle collection into aligned arrays.
pub fn normalize(raw: &[RawCandle]) -> Series {
    normalize_at(raw, Utc::now().naive_utc())
}

/// As [`normalize`], with an explicit "now" for bars lacking a timestamp.
///
/// Bars are stable-sorted by timestamp only when every timestamp parsed;
/// otherwise input order is kept so a bar stamped "now" cannot jump to the end.
pub fn normalize_at(raw: &[RawCandle], now: NaiveDateTime) -> Series {
    let mut candles = Vec::with_capacity(raw.len());
    let mut all_dated = true;

    for (i, r) in raw.iter().enumerate() {
        let (candle, dated) = normalize_candle(r, now);
        if !dated {
            tracing::warn!(index = i, "candle has no usable timestamp, using current time");
            all_dated = false;
        }
        if parse_number(field(r, "close")).is_none() {
            tracing::warn!(index = i, "candle has no usable close, defaulting to 0");
        }
        candles.push(candle);
    }

    if all_dated {
        candles.sort_by_key(|c| c.timestamp);
    }

    Series::from_candles(&candles)
}
