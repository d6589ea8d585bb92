//! Technical indicator implementations.
//!
//! Every function here is pure: it takes price arrays and returns a freshly
//! allocated array of exactly the input length, aligned index-for-index with
//! the source. Warm-up indices are filled per indicator rather than left as
//! NaN, and inputs too short for the period degrade to a zero-filled array.
//!
//! - [`sma::calculate_sma`]: warm-up passes the input value through
//! - [`ema::calculate_ema`]: seeded from the SMA, warm-up passes through
//! - [`atr::calculate_atr`]: Wilder smoothing, warm-up holds the raw true range
//! - [`rsi::calculate_rsi`]: Wilder smoothing, warm-up holds the neutral 50

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod sma;

use std::fmt;

/// Moving average flavour used by the crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaType {
    #[default]
    Sma,
    Ema,
}

impl MaType {
    pub fn from_use_ema(use_ema: bool) -> Self {
        if use_ema { MaType::Ema } else { MaType::Sma }
    }

    pub fn compute(&self, data: &[f64], period: usize) -> Vec<f64> {
        match self {
            MaType::Sma => sma::calculate_sma(data, period),
            MaType::Ema => ema::calculate_ema(data, period),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Atr(usize),
    Rsi(usize),
}

impl IndicatorType {
    pub fn moving_average(ma_type: MaType, period: usize) -> Self {
        match ma_type {
            MaType::Sma => IndicatorType::Sma(period),
            MaType::Ema => IndicatorType::Ema(period),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}
