//! Instrument identifiers.
//!
//! Tickers are ASCII alphanumeric, 1 to 20 characters, and handled
//! upper-case.

use std::collections::HashSet;

use crate::domain::error::SignalError;

pub const MAX_INSTRUMENT_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("invalid instrument: {0}")]
    Invalid(String),
}

impl From<InstrumentError> for SignalError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::EmptyToken => SignalError::InvalidInstrument(String::new()),
            InstrumentError::Invalid(s) => SignalError::InvalidInstrument(s),
        }
    }
}

pub fn is_valid_instrument(instrument: &str) -> bool {
    !instrument.is_empty()
        && instrument.len() <= MAX_INSTRUMENT_LEN
        && instrument.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Trims, upper-cases and validates a single ticker.
pub fn normalize_instrument(input: &str) -> Result<String, InstrumentError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InstrumentError::EmptyToken);
    }
    let upper = trimmed.to_uppercase();
    if !is_valid_instrument(&upper) {
        return Err(InstrumentError::Invalid(trimmed.to_string()));
    }
    Ok(upper)
}

/// Parses a comma-separated ticker list, keeping the first occurrence of each.
pub fn parse_instruments(input: &str) -> Result<Vec<String>, InstrumentError> {
    let mut instruments = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let instrument = normalize_instrument(token)?;
        if seen.insert(instrument.clone()) {
            instruments.push(instrument);
        }
    }

    Ok(instruments)
}
