//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_candle_adapter;

use crate::domain::error::SignalError;
use std::fs;
use std::path::Path;

/// Instrument names of files in `dir` ending with `suffix`, sorted.
pub(crate) fn list_instruments_with_suffix(
    dir: &Path,
    suffix: &str,
) -> Result<Vec<String>, SignalError> {
    let entries = fs::read_dir(dir).map_err(|e| SignalError::CandleSource {
        reason: format!("failed to read directory {}: {}", dir.display(), e),
    })?;

    let mut instruments = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SignalError::CandleSource {
            reason: format!("directory entry error: {}", e),
        })?;

        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if let Some(instrument) = name_str.strip_suffix(suffix) {
            if !instrument.is_empty() {
                instruments.push(instrument.to_string());
            }
        }
    }

    instruments.sort();
    Ok(instruments)
}
