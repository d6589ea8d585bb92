//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed EMA[n-1] with the SMA of the first n values, then
//! EMA[i] = (P[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: first (n-1) values pass through unchanged.

pub fn calculate_ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![0.0; data.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = Vec::with_capacity(data.len());
    ema.extend_from_slice(&data[..period - 1]);

    let seed = data[..period].iter().sum::<f64>() / period as f64;
    ema.push(seed);

    let mut prev = seed;
    for &price in &data[period..] {
        prev = (price - prev) * k + prev;
        ema.push(prev);
    }
    ema
}
