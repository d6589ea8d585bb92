//! CSV candle file adapter.
//!
//! Reads `<base>/<INSTRUMENT>_<timeframe>.csv` with a header row such as
//! `begin,open,high,low,close,volume`. Every cell is passed through as a
//! string; numeric parsing is left to the normalizer. Rows may be shorter or
//! longer than the header: missing cells are absent from the candle and extra
//! cells are ignored. Rows that fail to decode are skipped with a warning.

use crate::adapters::list_instruments_with_suffix;
use crate::domain::error::SignalError;
use crate::domain::normalizer::RawCandle;
use crate::ports::candle_port::CandlePort;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

pub struct CsvCandleAdapter {
    base_path: PathBuf,
}

impl CsvCandleAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str, timeframe: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", instrument, timeframe))
    }
}

impl CandlePort for CsvCandleAdapter {
    fn fetch_candles(
        &self,
        instrument: &str,
        timeframe: &str,
    ) -> Result<Vec<RawCandle>, SignalError> {
        let path = self.csv_path(instrument, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| SignalError::CandleSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| SignalError::CandleSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut candles = Vec::new();
        for result in rdr.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(instrument, path = %path.display(), error = %e, "skipping CSV row");
                    continue;
                }
            };

            let candle: RawCandle = headers
                .iter()
                .zip(record.iter())
                .filter(|(_, cell)| !cell.trim().is_empty())
                .map(|(name, cell)| (name.clone(), Value::String(cell.trim().to_string())))
                .collect();
            candles.push(candle);
        }

        tracing::debug!(instrument, timeframe, count = candles.len(), "read CSV candles");
        Ok(candles)
    }

    fn list_instruments(&self, timeframe: &str) -> Result<Vec<String>, SignalError> {
        list_instruments_with_suffix(&self.base_path, &format!("_{}.csv", timeframe))
    }
}
