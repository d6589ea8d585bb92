//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]) for i >= n-1.
//! Warmup (i < n-1): P[i] passed through unchanged.

pub fn calculate_sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![0.0; data.len()];
    }

    let mut sma = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        if i < period - 1 {
            sma.push(data[i]);
        } else {
            let window = &data[i + 1 - period..=i];
            sma.push(window.iter().sum::<f64>() / period as f64);
        }
    }
    sma
}
