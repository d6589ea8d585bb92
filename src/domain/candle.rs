//! Candle and aligned price-series representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Parallel per-bar arrays, aligned index-for-index and ordered oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
    pub timestamps: Vec<NaiveDateTime>,
}

impl Series {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut series = Series {
            highs: Vec::with_capacity(candles.len()),
            lows: Vec::with_capacity(candles.len()),
            closes: Vec::with_capacity(candles.len()),
            volumes: Vec::with_capacity(candles.len()),
            timestamps: Vec::with_capacity(candles.len()),
        };
        for c in candles {
            series.highs.push(c.high);
            series.lows.push(c.low);
            series.closes.push(c.close);
            series.volumes.push(c.volume);
            series.timestamps.push(c.timestamp);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Index of the latest bar, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn candle(&self, i: usize) -> Option<Candle> {
        Some(Candle {
            timestamp: *self.timestamps.get(i)?,
            high: *self.highs.get(i)?,
            low: *self.lows.get(i)?,
            close: *self.closes.get(i)?,
            volume: *self.volumes.get(i)?,
        })
    }
}
