//! Property tests for indicator and risk invariants.
//!
//! 1. Indicator outputs are aligned with their input
//! 2. SMA warm-up passes the data through
//! 3. RSI stays within [0, 100]
//! 4. Channel levels bound their window
//! 5. Position size is finite and non-negative

use candlesignal::domain::breakout::{breakout_level, PriceType};
use candlesignal::domain::indicator::atr::{calculate_atr, trailing_atr};
use candlesignal::domain::indicator::ema::calculate_ema;
use candlesignal::domain::indicator::rsi::calculate_rsi;
use candlesignal::domain::indicator::sma::calculate_sma;
use candlesignal::domain::instrument::normalize_instrument;
use candlesignal::domain::risk::position_size;
use proptest::prelude::*;

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 0..80)
}

/// (highs, lows, closes) with low <= close <= high on every bar.
fn arb_bars() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    prop::collection::vec((arb_price(), 0.0..5.0_f64, 0.0..1.0_f64), 0..80).prop_map(|bars| {
        let mut highs = Vec::with_capacity(bars.len());
        let mut lows = Vec::with_capacity(bars.len());
        let mut closes = Vec::with_capacity(bars.len());
        for (low, spread, pos) in bars {
            highs.push(low + spread);
            lows.push(low);
            closes.push(low + spread * pos);
        }
        (highs, lows, closes)
    })
}

// ── 1. Alignment ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn moving_averages_keep_length(closes in arb_closes(), period in 0usize..30) {
        prop_assert_eq!(calculate_sma(&closes, period).len(), closes.len());
        prop_assert_eq!(calculate_ema(&closes, period).len(), closes.len());
        prop_assert_eq!(calculate_rsi(&closes, period).len(), closes.len());
    }

    #[test]
    fn atr_keeps_length((highs, lows, closes) in arb_bars(), period in 0usize..30) {
        let atr = calculate_atr(&highs, &lows, &closes, period);
        prop_assert_eq!(atr.len(), closes.len());
        prop_assert!(atr.iter().all(|v| v.is_finite() && *v >= 0.0));
        let trailing = trailing_atr(&highs, &lows, &closes, period);
        prop_assert!(trailing.is_finite() && trailing >= 0.0);
    }
}

// ── 2. SMA warm-up ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn sma_warmup_is_raw_data(closes in arb_closes(), period in 1usize..30) {
        prop_assume!(closes.len() >= period);
        let sma = calculate_sma(&closes, period);
        for i in 0..period - 1 {
            prop_assert_eq!(sma[i], closes[i]);
        }
    }

    #[test]
    fn sma_of_constant_is_constant(price in arb_price(), len in 1usize..60, period in 1usize..20) {
        prop_assume!(len >= period);
        let closes = vec![price; len];
        for v in calculate_sma(&closes, period) {
            prop_assert!((v - price).abs() < 1e-9);
        }
    }
}

// ── 3. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(), period in 1usize..20) {
        for v in calculate_rsi(&closes, period) {
            prop_assert!((0.0..=100.0).contains(&v), "rsi {} out of range", v);
        }
    }
}

// ── 4. Channel levels ────────────────────────────────────────────────

proptest! {
    #[test]
    fn channel_levels_bound_window(closes in arb_closes(), days in 1usize..30) {
        prop_assume!(closes.len() >= days);
        let window = &closes[closes.len() - days..];
        let high = breakout_level(&closes, days, PriceType::High);
        let low = breakout_level(&closes, days, PriceType::Low);
        prop_assert!(window.iter().all(|&v| v <= high));
        prop_assert!(window.iter().all(|&v| v >= low));
        prop_assert!(window.contains(&high));
        prop_assert!(window.contains(&low));
    }

    #[test]
    fn short_window_yields_zero_level(closes in arb_closes(), extra in 1usize..10) {
        let days = closes.len() + extra;
        prop_assert_eq!(breakout_level(&closes, days, PriceType::High), 0.0);
    }
}

// ── 5. Sizing and identifiers ────────────────────────────────────────

proptest! {
    #[test]
    fn position_size_is_finite(
        price in arb_price(),
        stop in arb_price(),
        risk in 0.001..1.0_f64,
    ) {
        let size = position_size(price, stop, risk);
        prop_assert!(size.is_finite());
        prop_assert!(size >= 0.0);
    }

    #[test]
    fn normalized_instruments_are_idempotent(raw in "[a-zA-Z0-9]{1,20}") {
        let once = normalize_instrument(&format!("  {raw} ")).unwrap();
        let twice = normalize_instrument(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}
