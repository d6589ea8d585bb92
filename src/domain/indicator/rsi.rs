//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - Gain/loss per bar: max(C[i]-C[i-1], 0) and max(C[i-1]-C[i], 0)
//! - First average: simple mean of gains/losses over bars 1..=n
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup (i < n): neutral 50. Fewer than n+1 closes: zero-filled.

pub const NEUTRAL_RSI: f64 = 50.0;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return vec![0.0; closes.len()];
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut rsi = vec![NEUTRAL_RSI; closes.len()];

    let mut avg_gain = gains[1..=period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[1..=period].iter().sum::<f64>() / period as f64;
    rsi[period] = rsi_value(avg_gain, avg_loss);

    for i in period + 1..closes.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        rsi[i] = rsi_value(avg_gain, avg_loss);
    }

    rsi
}

/// Whether [`calculate_rsi`] produced real values rather than its zero fill.
pub fn has_rsi_history(len: usize, period: usize) -> bool {
    period > 0 && len > period
}
