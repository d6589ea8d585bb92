//! Average True Range.
//!
//! TR[i] = max(H[i]-L[i], |H[i]-C[i-1]|, |L[i]-C[i-1]|) for i >= 1; TR[0] = 0.
//! Wilder form: ATR[n] = mean(TR[1..=n]), then
//! ATR[i] = (ATR[i-1]*(n-1) + TR[i]) / n.
//! Warmup (i <= n): the raw TR[i], not a smoothed value.

/// True range per bar; index 0 has no previous close and stays 0.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    let mut tr = vec![0.0; highs.len()];
    for i in 1..n {
        let hl = highs[i] - lows[i];
        let hc = (highs[i] - closes[i - 1]).abs();
        let lc = (lows[i] - closes[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);
    }
    tr
}

pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len();
    if period == 0 || n < period + 1 || lows.len() < n || closes.len() < n {
        return vec![0.0; n];
    }

    let tr = true_ranges(highs, lows, closes);
    let mut atr = vec![0.0; n];

    // The seed index reports the raw true range; the seed only feeds the recurrence.
    atr[..=period].copy_from_slice(&tr[..=period]);

    let mut prev = tr[1..=period].iter().sum::<f64>() / period as f64;
    for i in period + 1..n {
        prev = (prev * (period - 1) as f64 + tr[i]) / period as f64;
        atr[i] = prev;
    }
    atr
}

/// Scalar ATR used for Turtle stops: plain mean of the trailing `period` true
/// ranges. Zero when fewer than `period + 1` bars are available.
pub fn trailing_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    let n = highs.len();
    if period == 0 || n < period + 1 || lows.len() < n || closes.len() < n {
        return 0.0;
    }

    let tr = true_ranges(highs, lows, closes);
    tr[n - period..].iter().sum::<f64>() / period as f64
}
