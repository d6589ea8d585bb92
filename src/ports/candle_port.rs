//! Candle source port trait.

use crate::domain::error::SignalError;
use crate::domain::normalizer::RawCandle;

/// Supplies raw candles for an instrument and timeframe. Values come back
/// loosely typed and go through the normalizer before analysis.
pub trait CandlePort {
    fn fetch_candles(&self, instrument: &str, timeframe: &str)
        -> Result<Vec<RawCandle>, SignalError>;

    /// Instruments that have candles for `timeframe`, sorted.
    fn list_instruments(&self, timeframe: &str) -> Result<Vec<String>, SignalError>;
}
