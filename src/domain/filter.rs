//! Entry filters, applied in order: trend, RSI, volume.

use crate::domain::crossover::CrossoverCandidate;
use crate::domain::indicator::rsi::{calculate_rsi, has_rsi_history};
use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{MaCrossoverConfig, TrendFilter};

/// Trailing bars averaged by the volume filter.
pub const VOLUME_WINDOW: usize = 20;

/// Trend filter. Only the selection exists; every candidate is accepted.
pub fn trend_filter_accepts(filter: TrendFilter, closes: &[f64], kind: SignalKind) -> bool {
    if let Some(period) = filter.period() {
        tracing::debug!(
            %filter,
            period,
            bars = closes.len(),
            %kind,
            "trend filter has no rule yet; accepting"
        );
    }
    true
}

/// RSI gate for entry candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiFilter {
    pub overbought: f64,
    pub oversold: f64,
    values: Vec<f64>,
}

impl RsiFilter {
    /// `None` when the filter is disabled or there are too few closes for the
    /// configured period.
    pub fn from_config(closes: &[f64], config: &MaCrossoverConfig) -> Option<Self> {
        if !config.rsi_filter {
            return None;
        }
        if !has_rsi_history(closes.len(), config.rsi_period) {
            tracing::debug!(
                bars = closes.len(),
                period = config.rsi_period,
                "RSI filter skipped: not enough history"
            );
            return None;
        }
        Some(Self {
            overbought: config.rsi_overbought,
            oversold: config.rsi_oversold,
            values: calculate_rsi(closes, config.rsi_period),
        })
    }

    pub fn value_at(&self, t: usize) -> Option<f64> {
        self.values.get(t).copied()
    }

    /// Longs are rejected at or above overbought, shorts at or below oversold.
    pub fn accepts(&self, kind: SignalKind, t: usize) -> bool {
        let Some(rsi) = self.value_at(t) else {
            return true;
        };
        let accepted = match kind {
            SignalKind::EntryLong => rsi < self.overbought,
            SignalKind::EntryShort => rsi > self.oversold,
            _ => true,
        };
        if !accepted {
            tracing::debug!(
                %kind,
                rsi,
                overbought = self.overbought,
                oversold = self.oversold,
                "RSI filter rejected candidate"
            );
        }
        accepted
    }
}

/// Runs the trend and RSI filters over crossover candidates.
pub fn filter_candidates(
    candidates: Vec<CrossoverCandidate>,
    closes: &[f64],
    config: &MaCrossoverConfig,
) -> Vec<CrossoverCandidate> {
    let rsi = RsiFilter::from_config(closes, config);
    candidates
        .into_iter()
        .filter(|c| trend_filter_accepts(config.trend_filter, closes, c.direction.signal_kind()))
        .filter(|c| {
            rsi.as_ref()
                .is_none_or(|f| f.accepts(c.direction.signal_kind(), c.index))
        })
        .collect()
}

/// Mean volume over the trailing window ending at `t` (at most
/// [`VOLUME_WINDOW`] bars).
pub fn average_volume(volumes: &[f64], t: usize) -> f64 {
    if t >= volumes.len() {
        return 0.0;
    }
    let start = (t + 1).saturating_sub(VOLUME_WINDOW);
    let window = &volumes[start..=t];
    window.iter().sum::<f64>() / window.len() as f64
}

/// Current volume over average; 0 when the average is 0.
pub fn volume_ratio(current: f64, average: f64) -> f64 {
    if average == 0.0 { 0.0 } else { current / average }
}

/// Keeps signals whose bar-`t` volume is at least `min_multiplier` times the
/// trailing average, appending the confirmation to each kept rationale.
pub fn apply_volume_filter(
    signals: Vec<Signal>,
    volumes: &[f64],
    t: usize,
    min_multiplier: f64,
) -> Vec<Signal> {
    if signals.is_empty() {
        return signals;
    }
    let current = volumes.get(t).copied().unwrap_or(0.0);
    let average = average_volume(volumes, t);
    let ratio = volume_ratio(current, average);

    if ratio < min_multiplier {
        tracing::debug!(
            volume = current,
            average,
            ratio,
            min_multiplier,
            "volume filter rejected candidates"
        );
        return Vec::new();
    }

    signals
        .into_iter()
        .map(|mut s| {
            s.rationale
                .push_str(&format!("\nvolume confirmation: {current:.0} ({ratio:.1}x of average)"));
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crossover::CrossDirection;
    use approx::assert_relative_eq;
    use chrono::NaiveDateTime;

    fn candidate(direction: CrossDirection, index: usize) -> CrossoverCandidate {
        CrossoverCandidate {
            index,
            direction,
            fast: 0.0,
            slow: 0.0,
            gap_pct: 0.0,
            confirmations: 0,
        }
    }

    fn signal(kind: SignalKind) -> Signal {
        Signal::new("SBER", kind, 100.0, "base".into(), NaiveDateTime::default())
    }

    #[test]
    fn trend_filter_always_accepts() {
        assert!(trend_filter_accepts(TrendFilter::Sma200, &[1.0], SignalKind::EntryLong));
        assert!(trend_filter_accepts(TrendFilter::None, &[], SignalKind::EntryShort));
    }

    #[test]
    fn rsi_filter_disabled_or_short_history() {
        let cfg = MaCrossoverConfig::default();
        assert!(RsiFilter::from_config(&[1.0; 30], &cfg).is_none());

        let cfg = MaCrossoverConfig {
            rsi_filter: true,
            rsi_period: 14,
            ..Default::default()
        };
        assert!(RsiFilter::from_config(&[1.0; 14], &cfg).is_none());
        assert!(RsiFilter::from_config(&[1.0; 15], &cfg).is_some());
    }

    #[test]
    fn rsi_filter_thresholds_are_inclusive_rejects() {
        // rising closes: RSI 100 after warm-up
        let closes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let cfg = MaCrossoverConfig {
            rsi_filter: true,
            rsi_period: 3,
            rsi_overbought: 100.0,
            rsi_oversold: 100.0,
            ..Default::default()
        };
        let f = RsiFilter::from_config(&closes, &cfg).unwrap();
        assert!(!f.accepts(SignalKind::EntryLong, 9));
        assert!(!f.accepts(SignalKind::EntryShort, 9));
        assert!(f.accepts(SignalKind::ExitLong, 9));
    }

    #[test]
    fn filter_candidates_uses_rsi_at_candidate_bar() {
        let closes = [5.0, 5.0, 5.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let lenient = MaCrossoverConfig {
            rsi_filter: true,
            rsi_period: 5,
            rsi_overbought: 90.0,
            ..Default::default()
        };
        // bar 4 is still RSI warm-up (50)
        let kept = filter_candidates(vec![candidate(CrossDirection::Golden, 4)], &closes, &lenient);
        assert_eq!(kept.len(), 1);

        let strict = MaCrossoverConfig {
            rsi_overbought: 10.0,
            ..lenient
        };
        let kept = filter_candidates(vec![candidate(CrossDirection::Golden, 4)], &closes, &strict);
        assert!(kept.is_empty());
    }

    #[test]
    fn average_volume_uses_short_window_early() {
        let volumes = [10.0, 20.0, 30.0];
        assert_relative_eq!(average_volume(&volumes, 1), 15.0);
        assert_relative_eq!(average_volume(&volumes, 2), 20.0);
        assert_eq!(average_volume(&volumes, 3), 0.0);
    }

    #[test]
    fn average_volume_caps_at_twenty_bars() {
        let mut volumes = vec![1000.0; 5];
        volumes.extend(vec![10.0; 20]);
        assert_relative_eq!(average_volume(&volumes, 24), 10.0);
    }

    #[test]
    fn volume_ratio_guards_zero_average() {
        assert_eq!(volume_ratio(500.0, 0.0), 0.0);
        assert_relative_eq!(volume_ratio(300.0, 200.0), 1.5);
    }

    #[test]
    fn volume_filter_appends_confirmation() {
        let mut volumes = vec![100.0; 19];
        volumes.push(300.0);
        let kept = apply_volume_filter(vec![signal(SignalKind::EntryLong)], &volumes, 19, 1.5);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].rationale.starts_with("base\nvolume confirmation: 300"));
        assert!(kept[0].rationale.contains("x of average"));
    }

    #[test]
    fn volume_filter_rejects_thin_volume() {
        let volumes = vec![100.0; 20];
        let kept = apply_volume_filter(vec![signal(SignalKind::EntryShort)], &volumes, 19, 1.5);
        assert!(kept.is_empty());
    }

    #[test]
    fn volume_filter_zero_volume_rejects() {
        let volumes = vec![0.0; 20];
        let kept = apply_volume_filter(vec![signal(SignalKind::EntryLong)], &volumes, 19, 0.5);
        assert!(kept.is_empty());
    }
}
