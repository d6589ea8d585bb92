//! Turtle breakout channels.
//!
//! A channel level is the highest high (or lowest low) of the trailing `days`
//! bars, current bar included. The latest close is classified against four
//! levels: entry high/low over `entry_breakout_days` and exit high/low over
//! `exit_breakout_days`. Comparisons are boundary-inclusive and independent,
//! so several can fire on the same bar.

use chrono::NaiveDateTime;

use crate::domain::candle::Series;
use crate::domain::signal::SignalKind;
use crate::domain::strategy::TurtleConfig;

/// Match tolerance when locating the bar that set a level.
pub const LEVEL_MATCH_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceType {
    High,
    Low,
}

/// Max (High) or min (Low) of the trailing `days` values. 0 when the series
/// is shorter than `days` or `days` is 0.
pub fn breakout_level(prices: &[f64], days: usize, price_type: PriceType) -> f64 {
    if days == 0 || prices.len() < days {
        return 0.0;
    }
    let window = &prices[prices.len() - days..];
    match price_type {
        PriceType::High => window.iter().copied().fold(window[0], f64::max),
        PriceType::Low => window.iter().copied().fold(window[0], f64::min),
    }
}

/// Index of the bar that set `level` within the trailing `days` window.
///
/// Scans from the most recent bar backward for the first value within
/// [`LEVEL_MATCH_TOLERANCE`]. When nothing matches, falls back to the middle
/// of the window. `None` when the series is shorter than `days`.
pub fn find_breakout_index(prices: &[f64], level: f64, days: usize) -> Option<usize> {
    if days == 0 || prices.len() < days {
        return None;
    }
    let start = prices.len() - days;
    let found = (start..prices.len())
        .rev()
        .find(|&i| (prices[i] - level).abs() < LEVEL_MATCH_TOLERANCE);
    Some(found.unwrap_or(start + days / 2))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLevel {
    pub value: f64,
    /// When the level was set; the latest bar's time if it cannot be located.
    pub set_at: NaiveDateTime,
}

impl ChannelLevel {
    fn locate(series: &Series, prices: &[f64], days: usize, price_type: PriceType) -> Self {
        let value = breakout_level(prices, days, price_type);
        let fallback = series.timestamps.last().copied().unwrap_or_default();
        let set_at = find_breakout_index(prices, value, days)
            .and_then(|i| series.timestamps.get(i).copied())
            .unwrap_or(fallback);
        Self { value, set_at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutLevels {
    pub entry_high: ChannelLevel,
    pub entry_low: ChannelLevel,
    pub exit_high: ChannelLevel,
    pub exit_low: ChannelLevel,
}

impl BreakoutLevels {
    pub fn compute(series: &Series, config: &TurtleConfig) -> Self {
        let levels = Self {
            entry_high: ChannelLevel::locate(
                series,
                &series.highs,
                config.entry_breakout_days,
                PriceType::High,
            ),
            entry_low: ChannelLevel::locate(
                series,
                &series.lows,
                config.entry_breakout_days,
                PriceType::Low,
            ),
            exit_high: ChannelLevel::locate(
                series,
                &series.highs,
                config.exit_breakout_days,
                PriceType::High,
            ),
            exit_low: ChannelLevel::locate(
                series,
                &series.lows,
                config.exit_breakout_days,
                PriceType::Low,
            ),
        };
        tracing::debug!(
            entry_high = levels.entry_high.value,
            entry_low = levels.entry_low.value,
            exit_high = levels.exit_high.value,
            exit_low = levels.exit_low.value,
            "computed breakout levels"
        );
        levels
    }

    /// Every condition the price satisfies, in entry-long, entry-short,
    /// exit-long, exit-short order. Empty when none fire.
    pub fn classify(&self, price: f64) -> Vec<SignalKind> {
        let mut kinds = Vec::new();
        if price >= self.entry_high.value {
            kinds.push(SignalKind::EntryLong);
        }
        if price <= self.entry_low.value {
            kinds.push(SignalKind::EntryShort);
        }
        if price <= self.exit_low.value {
            kinds.push(SignalKind::ExitLong);
        }
        if price >= self.exit_high.value {
            kinds.push(SignalKind::ExitShort);
        }
        kinds
    }

    /// The level a given signal kind was triggered by.
    pub fn level_for(&self, kind: SignalKind) -> Option<&ChannelLevel> {
        match kind {
            SignalKind::EntryLong => Some(&self.entry_high),
            SignalKind::EntryShort => Some(&self.entry_low),
            SignalKind::ExitLong => Some(&self.exit_low),
            SignalKind::ExitShort => Some(&self.exit_high),
            SignalKind::NoSignal => None,
        }
    }
}
