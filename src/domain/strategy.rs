//! Strategy configuration values.
//!
//! Configuration is owned by the caller and passed into every engine call as
//! an immutable snapshot; the engine keeps no configuration state of its own.

use std::fmt;
use std::str::FromStr;

use crate::domain::indicator::MaType;

pub const VALID_TIMEFRAMES: [&str; 6] = ["1", "10", "60", "24", "7", "31"];

#[derive(Debug, Clone, PartialEq)]
pub struct TurtleConfig {
    pub enabled: bool,
    pub timeframe: String,
    pub lookback_period: usize,
    pub entry_breakout_days: usize,
    pub exit_breakout_days: usize,
    pub risk_per_trade: f64,
    pub atr_period: usize,
    pub atr_multiplier: f64,
}

impl TurtleConfig {
    /// Bars required before the channels are computed: the lookback or the
    /// widest breakout window, whichever is longer.
    pub fn minimum_bars(&self) -> usize {
        self.lookback_period
            .max(self.entry_breakout_days)
            .max(self.exit_breakout_days)
    }
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeframe: "24".into(),
            lookback_period: 20,
            entry_breakout_days: 20,
            exit_breakout_days: 10,
            risk_per_trade: 0.02,
            atr_period: 20,
            atr_multiplier: 2.0,
        }
    }
}

/// Trend filter selection. Only the branch structure exists; see
/// [`crate::domain::filter::trend_filter_accepts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendFilter {
    #[default]
    None,
    Sma50,
    Sma200,
}

impl TrendFilter {
    pub fn period(&self) -> Option<usize> {
        match self {
            TrendFilter::None => None,
            TrendFilter::Sma50 => Some(50),
            TrendFilter::Sma200 => Some(200),
        }
    }
}

impl FromStr for TrendFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(TrendFilter::None),
            "sma50" => Ok(TrendFilter::Sma50),
            "sma200" => Ok(TrendFilter::Sma200),
            other => Err(format!("unknown trend filter '{other}' (expected none, sma50, sma200)")),
        }
    }
}

impl fmt::Display for TrendFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendFilter::None => write!(f, "none"),
            TrendFilter::Sma50 => write!(f, "sma50"),
            TrendFilter::Sma200 => write!(f, "sma200"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaCrossoverConfig {
    pub enabled: bool,
    pub timeframe: String,
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    pub use_ema: bool,
    pub use_volume_confirmation: bool,
    pub min_volume_multiplier: f64,
    pub risk_per_trade: f64,
    pub stop_loss_atr_multiplier: f64,
    pub take_profit_ratio: f64,
    pub atr_period: usize,
    pub golden_cross: bool,
    pub death_cross: bool,
    pub require_confirmation: i64,
    pub trend_filter: TrendFilter,
    pub rsi_filter: bool,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl MaCrossoverConfig {
    pub fn ma_type(&self) -> MaType {
        MaType::from_use_ema(self.use_ema)
    }

    /// Bars required before a crossover analysis is attempted.
    pub fn minimum_bars(&self) -> usize {
        self.slow_period + 20
    }
}

impl Default for MaCrossoverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeframe: "24".into(),
            fast_period: 10,
            slow_period: 30,
            signal_period: 0,
            use_ema: false,
            use_volume_confirmation: false,
            min_volume_multiplier: 1.5,
            risk_per_trade: 0.02,
            stop_loss_atr_multiplier: 2.0,
            take_profit_ratio: 2.0,
            atr_period: 14,
            golden_cross: true,
            death_cross: true,
            require_confirmation: 0,
            trend_filter: TrendFilter::None,
            rsi_filter: false,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrategyConfig {
    pub turtle: TurtleConfig,
    pub ma_crossover: MaCrossoverConfig,
}
