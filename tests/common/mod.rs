#![allow(dead_code)]

use candlesignal::domain::candle::{Candle, Series};
use candlesignal::domain::error::SignalError;
use candlesignal::domain::normalizer::RawCandle;
use candlesignal::ports::candle_port::CandlePort;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::json;
use std::collections::HashMap;
use std::process::ExitCode;

pub struct MockCandlePort {
    pub data: HashMap<(String, String), Vec<RawCandle>>,
    pub errors: HashMap<String, String>,
}

impl MockCandlePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, instrument: &str, timeframe: &str, candles: Vec<RawCandle>) -> Self {
        self.data
            .insert((instrument.to_string(), timeframe.to_string()), candles);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors.insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl CandlePort for MockCandlePort {
    fn fetch_candles(
        &self,
        instrument: &str,
        timeframe: &str,
    ) -> Result<Vec<RawCandle>, SignalError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(SignalError::CandleSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(&(instrument.to_string(), timeframe.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn list_instruments(&self, timeframe: &str) -> Result<Vec<String>, SignalError> {
        let mut names: Vec<String> = self
            .data
            .keys()
            .filter(|(_, tf)| tf == timeframe)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Daily bars from 2024-01-01 with high = low = close.
pub fn series_from_closes(closes: &[f64]) -> Series {
    let volumes = vec![1000.0; closes.len()];
    series_with_volumes(closes, &volumes)
}

pub fn series_with_volumes(closes: &[f64], volumes: &[f64]) -> Series {
    let start = date(2024, 1, 1);
    let candles: Vec<Candle> = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| Candle {
            timestamp: start + Duration::days(i as i64),
            high: close,
            low: close,
            close,
            volume,
        })
        .collect();
    Series::from_candles(&candles)
}

/// Raw candles in the loosely-typed API shape, one per close.
pub fn raw_candles(closes: &[f64]) -> Vec<RawCandle> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let ts = start + Duration::days(i as i64);
            json!({
                "begin": ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                "open": close,
                "high": close,
                "low": close,
                "close": close,
                "volume": 1000,
            })
            .as_object()
            .cloned()
            .unwrap()
        })
        .collect()
}

/// Flat closes followed by one breakout bar.
pub fn breakout_closes(flat: f64, count: usize, last: f64) -> Vec<f64> {
    let mut closes = vec![flat; count - 1];
    closes.push(last);
    closes
}

pub fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

pub fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}
