//! JSON candle file adapter.
//!
//! Reads `<base>/<INSTRUMENT>_<timeframe>.json`, either `{"candles": [...]}`
//! or a bare array of candle objects.

use crate::adapters::list_instruments_with_suffix;
use crate::domain::error::SignalError;
use crate::domain::normalizer::RawCandle;
use crate::ports::candle_port::CandlePort;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub struct JsonCandleAdapter {
    base_path: PathBuf,
}

impl JsonCandleAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn json_path(&self, instrument: &str, timeframe: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.json", instrument, timeframe))
    }
}

/// Extracts candle objects from either accepted document shape. Non-object
/// entries are skipped.
pub fn parse_candle_document(body: &str) -> Result<Vec<RawCandle>, SignalError> {
    let doc: Value = serde_json::from_str(body).map_err(|e| SignalError::CandleSource {
        reason: format!("invalid candle JSON: {}", e),
    })?;

    let items = match doc {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("candles") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SignalError::CandleSource {
                    reason: "expected a \"candles\" array".into(),
                });
            }
        },
        _ => {
            return Err(SignalError::CandleSource {
                reason: "expected an array or an object with \"candles\"".into(),
            });
        }
    };

    let total = items.len();
    let candles: Vec<RawCandle> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();
    if candles.len() < total {
        tracing::warn!(skipped = total - candles.len(), "ignored non-object candle entries");
    }
    Ok(candles)
}

impl CandlePort for JsonCandleAdapter {
    fn fetch_candles(
        &self,
        instrument: &str,
        timeframe: &str,
    ) -> Result<Vec<RawCandle>, SignalError> {
        let path = self.json_path(instrument, timeframe);
        let body = fs::read_to_string(&path).map_err(|e| SignalError::CandleSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let candles = parse_candle_document(&body)?;
        tracing::debug!(instrument, timeframe, count = candles.len(), "read JSON candles");
        Ok(candles)
    }

    fn list_instruments(&self, timeframe: &str) -> Result<Vec<String>, SignalError> {
        list_instruments_with_suffix(&self.base_path, &format!("_{}.json", timeframe))
    }
}
