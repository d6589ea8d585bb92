//! Moving average crossover detection.
//!
//! Golden cross at t: fast[t-1] <= slow[t-1] and fast[t] > slow[t].
//! Death cross at t:  fast[t-1] >= slow[t-1] and fast[t] < slow[t].
//!
//! With a confirmation count K > 0 the relation must also hold strictly on
//! every bar of [t-K+1, t], and t must be at least K.

use crate::domain::indicator::{IndicatorType, MaType};
use crate::domain::signal::{percent_of, SignalKind};
use crate::domain::strategy::MaCrossoverConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    Golden,
    Death,
}

impl CrossDirection {
    pub fn signal_kind(&self) -> SignalKind {
        match self {
            CrossDirection::Golden => SignalKind::EntryLong,
            CrossDirection::Death => SignalKind::EntryShort,
        }
    }

    fn holds(&self, fast: f64, slow: f64) -> bool {
        match self {
            CrossDirection::Golden => fast > slow,
            CrossDirection::Death => fast < slow,
        }
    }
}

/// Fast/slow (and optional signal) moving averages over the closes.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverIndicators {
    pub fast_type: IndicatorType,
    pub slow_type: IndicatorType,
    pub fast: Vec<f64>,
    pub slow: Vec<f64>,
    pub signal: Option<Vec<f64>>,
}

impl CrossoverIndicators {
    pub fn compute(closes: &[f64], config: &MaCrossoverConfig) -> Self {
        Self::with_periods(
            closes,
            config.ma_type(),
            config.fast_period,
            config.slow_period,
            config.signal_period,
        )
    }

    pub fn with_periods(
        closes: &[f64],
        ma_type: MaType,
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Self {
        let signal = (signal_period > 0).then(|| ma_type.compute(closes, signal_period));
        Self {
            fast_type: IndicatorType::moving_average(ma_type, fast_period),
            slow_type: IndicatorType::moving_average(ma_type, slow_period),
            fast: ma_type.compute(closes, fast_period),
            slow: ma_type.compute(closes, slow_period),
            signal,
        }
    }
}

/// Crossover at `t`, if any. Requires `t >= 1` and both arrays longer than `t`.
pub fn detect_cross(fast: &[f64], slow: &[f64], t: usize) -> Option<CrossDirection> {
    if t == 0 || t >= fast.len() || t >= slow.len() {
        return None;
    }
    let (fast_prev, slow_prev) = (fast[t - 1], slow[t - 1]);
    let (fast_now, slow_now) = (fast[t], slow[t]);

    if fast_prev <= slow_prev && fast_now > slow_now {
        Some(CrossDirection::Golden)
    } else if fast_prev >= slow_prev && fast_now < slow_now {
        Some(CrossDirection::Death)
    } else {
        None
    }
}

/// Confirmation window check. `confirmations <= 0` always passes.
pub fn is_confirmed(
    fast: &[f64],
    slow: &[f64],
    t: usize,
    direction: CrossDirection,
    confirmations: i64,
) -> bool {
    if confirmations <= 0 {
        return true;
    }
    let k = confirmations as usize;
    if t < k || t >= fast.len() || t >= slow.len() {
        return false;
    }
    (t + 1 - k..=t).all(|i| direction.holds(fast[i], slow[i]))
}

/// Every crossover in the series, oldest first.
pub fn scan_crossovers(fast: &[f64], slow: &[f64]) -> Vec<(usize, CrossDirection)> {
    let n = fast.len().min(slow.len());
    (1..n)
        .filter_map(|t| detect_cross(fast, slow, t).map(|d| (t, d)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverCandidate {
    pub index: usize,
    pub direction: CrossDirection,
    pub fast: f64,
    pub slow: f64,
    /// Gap between the averages as a percentage of the one being crossed.
    pub gap_pct: f64,
    pub confirmations: i64,
}

/// Confirmed, enabled crossover candidates at bar `t`.
pub fn detect_candidates(
    indicators: &CrossoverIndicators,
    t: usize,
    config: &MaCrossoverConfig,
) -> Vec<CrossoverCandidate> {
    let Some(direction) = detect_cross(&indicators.fast, &indicators.slow, t) else {
        return Vec::new();
    };

    let enabled = match direction {
        CrossDirection::Golden => config.golden_cross,
        CrossDirection::Death => config.death_cross,
    };
    if !enabled {
        tracing::debug!(index = t, ?direction, "crossover type disabled");
        return Vec::new();
    }

    if !is_confirmed(
        &indicators.fast,
        &indicators.slow,
        t,
        direction,
        config.require_confirmation,
    ) {
        tracing::debug!(
            index = t,
            ?direction,
            confirmations = config.require_confirmation,
            "crossover not confirmed"
        );
        return Vec::new();
    }

    let fast = indicators.fast[t];
    let slow = indicators.slow[t];
    let gap_pct = match direction {
        CrossDirection::Golden => percent_of(fast - slow, slow),
        CrossDirection::Death => percent_of(slow - fast, fast),
    };

    vec![CrossoverCandidate {
        index: t,
        direction,
        fast,
        slow,
        gap_pct,
        confirmations: config.require_confirmation,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn golden_cross_detected() {
        let fast = [1.0, 2.0, 4.0];
        let slow = [2.0, 2.0, 3.0];
        assert_eq!(detect_cross(&fast, &slow, 2), Some(CrossDirection::Golden));
        assert_eq!(detect_cross(&fast, &slow, 1), None);
    }

    #[test]
    fn golden_cross_from_touching() {
        // fast == slow on the previous bar still counts.
        let fast = [2.0, 3.0];
        let slow = [2.0, 2.5];
        assert_eq!(detect_cross(&fast, &slow, 1), Some(CrossDirection::Golden));
    }

    #[test]
    fn death_cross_detected() {
        let fast = [5.0, 4.0, 2.0];
        let slow = [3.0, 4.0, 3.0];
        assert_eq!(detect_cross(&fast, &slow, 2), Some(CrossDirection::Death));
    }

    #[test]
    fn no_cross_at_index_zero_or_out_of_range() {
        let fast = [1.0, 2.0];
        let slow = [2.0, 1.0];
        assert_eq!(detect_cross(&fast, &slow, 0), None);
        assert_eq!(detect_cross(&fast, &slow, 2), None);
    }

    #[test]
    fn confirmation_disabled_passes() {
        assert!(is_confirmed(&[1.0], &[2.0], 0, CrossDirection::Golden, 0));
        assert!(is_confirmed(&[1.0], &[2.0], 0, CrossDirection::Golden, -3));
    }

    #[test]
    fn confirmation_requires_strict_relation_in_window() {
        let fast = [1.0, 3.0, 3.0, 3.0];
        let slow = [2.0, 2.0, 2.0, 2.0];
        assert!(is_confirmed(&fast, &slow, 3, CrossDirection::Golden, 3));
        assert!(!is_confirmed(&fast, &slow, 3, CrossDirection::Golden, 4));
    }

    #[test]
    fn confirmation_voided_by_flip_in_window() {
        let fast = [3.0, 3.0, 1.0, 3.0];
        let slow = [2.0, 2.0, 2.0, 2.0];
        assert!(!is_confirmed(&fast, &slow, 3, CrossDirection::Golden, 3));
    }

    #[test]
    fn confirmation_needs_enough_history() {
        let fast = [3.0, 3.0];
        let slow = [2.0, 2.0];
        assert!(!is_confirmed(&fast, &slow, 1, CrossDirection::Golden, 2));
        assert!(is_confirmed(&fast, &slow, 1, CrossDirection::Golden, 1));
    }

    #[test]
    fn scan_finds_each_cross_once() {
        let fast = [1.0, 3.0, 3.0, 1.0, 1.0];
        let slow = [2.0, 2.0, 2.0, 2.0, 2.0];
        assert_eq!(
            scan_crossovers(&fast, &slow),
            vec![(1, CrossDirection::Golden), (3, CrossDirection::Death)]
        );
    }

    #[test]
    fn candidate_records_gap_and_confirmation() {
        let closes = [5.0, 5.0, 5.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let config = MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
            ..Default::default()
        };
        let ind = CrossoverIndicators::compute(&closes, &config);
        let candidates = detect_candidates(&ind, 4, &config);

        assert_eq!(candidates.len(), 1);
        let c = candidates[0];
        assert_eq!(c.direction, CrossDirection::Golden);
        assert_relative_eq!(c.fast, 5.5);
        assert_relative_eq!(c.slow, 5.25);
        assert_relative_eq!(c.gap_pct, (5.5 - 5.25) / 5.25 * 100.0);
        assert_eq!(c.confirmations, 0);
    }

    #[test]
    fn disabled_golden_cross_yields_nothing() {
        let closes = [5.0, 5.0, 5.0, 5.0, 6.0, 7.0];
        let config = MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
            golden_cross: false,
            ..Default::default()
        };
        let ind = CrossoverIndicators::compute(&closes, &config);
        assert!(detect_candidates(&ind, 4, &config).is_empty());
    }

    #[test]
    fn signal_average_only_when_requested() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let without = CrossoverIndicators::with_periods(&closes, MaType::Sma, 1, 2, 0);
        assert!(without.signal.is_none());
        let with = CrossoverIndicators::with_periods(&closes, MaType::Ema, 1, 2, 3);
        assert_eq!(with.signal.map(|s| s.len()), Some(4));
        assert_eq!(with.fast_type, IndicatorType::Ema(1));
    }
}
