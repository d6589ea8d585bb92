//! Strategy pipelines: series in, signals out.
//!
//! Every call recomputes from the full series. Nothing is cached between
//! calls and the configuration is only read, so the functions here can run
//! concurrently for different instruments.

use crate::domain::breakout::BreakoutLevels;
use crate::domain::candle::Series;
use crate::domain::crossover::{detect_candidates, CrossoverIndicators};
use crate::domain::emitter::{
    crossover_rationale, risk_note, turtle_entry_rationale, turtle_exit_rationale,
    turtle_no_signal_rationale,
};
use crate::domain::error::SignalError;
use crate::domain::filter::{apply_volume_filter, filter_candidates};
use crate::domain::indicator::atr::{calculate_atr, trailing_atr};
use crate::domain::risk::{crossover_risk, turtle_risk};
use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{MaCrossoverConfig, StrategyConfig, TurtleConfig};

/// Index of the latest bar, or `InsufficientData` when the series is shorter
/// than `minimum` (an empty series is always insufficient).
fn latest_bar(instrument: &str, series: &Series, minimum: usize) -> Result<usize, SignalError> {
    match series.last_index() {
        Some(t) if series.len() >= minimum => Ok(t),
        _ => Err(SignalError::InsufficientData {
            instrument: instrument.to_string(),
            bars: series.len(),
            minimum: minimum.max(1),
        }),
    }
}

/// Channel breakout analysis on the latest bar.
///
/// Returns every breakout condition that fires, or a single `NoSignal`
/// describing the current levels when none does.
pub fn analyze_turtle(
    instrument: &str,
    series: &Series,
    config: &TurtleConfig,
) -> Result<Vec<Signal>, SignalError> {
    let t = latest_bar(instrument, series, config.minimum_bars())?;
    let price = series.closes[t];
    let now = series.timestamps.get(t).copied().unwrap_or_default();
    let atr = trailing_atr(&series.highs, &series.lows, &series.closes, config.atr_period);
    let levels = BreakoutLevels::compute(series, config);

    let kinds = levels.classify(price);
    if kinds.is_empty() {
        tracing::debug!(instrument, price, "no breakout");
        let rationale = turtle_no_signal_rationale(instrument, price, atr, &levels);
        return Ok(vec![Signal::new(
            instrument,
            SignalKind::NoSignal,
            price,
            rationale,
            now,
        )]);
    }

    let signals = kinds
        .into_iter()
        .filter_map(|kind| {
            let level = levels.level_for(kind)?;
            let signal = if kind.is_entry() {
                let risk = turtle_risk(
                    kind,
                    price,
                    atr,
                    config.atr_multiplier,
                    config.risk_per_trade,
                );
                let rationale = turtle_entry_rationale(kind, price, level, atr, &risk);
                Signal::new(instrument, kind, price, rationale, now).with_risk(risk)
            } else {
                let rationale = turtle_exit_rationale(kind, price, level, now);
                Signal::new(instrument, kind, price, rationale, now)
            };
            Some(signal)
        })
        .collect::<Vec<_>>();

    tracing::debug!(instrument, count = signals.len(), "turtle signals");
    Ok(signals)
}

/// Moving average crossover analysis on the latest bar. An empty result means
/// no accepted crossover.
pub fn analyze_ma_crossover(
    instrument: &str,
    series: &Series,
    config: &MaCrossoverConfig,
) -> Result<Vec<Signal>, SignalError> {
    let t = latest_bar(instrument, series, config.minimum_bars())?;
    let indicators = CrossoverIndicators::compute(&series.closes, config);
    Ok(evaluate_crossover_at(instrument, series, config, &indicators, t))
}

/// Crossover pipeline at an arbitrary bar `t`: detection, trend and RSI
/// filters, volume confirmation, then risk parameters.
pub fn evaluate_crossover_at(
    instrument: &str,
    series: &Series,
    config: &MaCrossoverConfig,
    indicators: &CrossoverIndicators,
    t: usize,
) -> Vec<Signal> {
    let Some(&price) = series.closes.get(t) else {
        return Vec::new();
    };
    let candidates = detect_candidates(indicators, t, config);
    let candidates = filter_candidates(candidates, &series.closes, config);
    if candidates.is_empty() {
        return Vec::new();
    }

    let timestamp = series.timestamps.get(t).copied().unwrap_or_default();
    let mut signals: Vec<Signal> = candidates
        .iter()
        .map(|c| {
            Signal::new(
                instrument,
                c.direction.signal_kind(),
                price,
                crossover_rationale(c, indicators, price),
                timestamp,
            )
        })
        .collect();

    if config.use_volume_confirmation {
        signals = apply_volume_filter(signals, &series.volumes, t, config.min_volume_multiplier);
    }

    let atr = calculate_atr(&series.highs, &series.lows, &series.closes, config.atr_period)
        .get(t)
        .copied()
        .unwrap_or(0.0);

    signals
        .into_iter()
        .map(|signal| {
            let risk = crossover_risk(
                signal.kind,
                price,
                atr,
                config.stop_loss_atr_multiplier,
                config.take_profit_ratio,
                config.risk_per_trade,
            );
            let mut signal = signal.with_risk(risk);
            signal
                .rationale
                .push_str(&risk_note(price, &risk, config.take_profit_ratio, atr));
            signal
        })
        .collect()
}

/// Runs every enabled strategy, Turtle first, each on the series `load`
/// returns for that strategy's timeframe. A series is loaded once and reused
/// when both strategies share a timeframe.
pub fn analyze_by_timeframe<F>(
    instrument: &str,
    config: &StrategyConfig,
    mut load: F,
) -> Result<Vec<Signal>, SignalError>
where
    F: FnMut(&str) -> Result<Series, SignalError>,
{
    let mut signals = Vec::new();
    let mut turtle_series = None;

    if config.turtle.enabled {
        let series = load(&config.turtle.timeframe)?;
        signals.extend(analyze_turtle(instrument, &series, &config.turtle)?);
        turtle_series = Some(series);
    }

    if config.ma_crossover.enabled {
        let ma = &config.ma_crossover;
        let series = match turtle_series {
            Some(series) if config.turtle.timeframe == ma.timeframe => series,
            _ => load(&ma.timeframe)?,
        };
        signals.extend(analyze_ma_crossover(instrument, &series, ma)?);
    }

    Ok(signals)
}

/// Runs every enabled strategy over one already-loaded series, ignoring the
/// configured timeframes.
pub fn analyze(
    instrument: &str,
    series: &Series,
    config: &StrategyConfig,
) -> Result<Vec<Signal>, SignalError> {
    analyze_by_timeframe(instrument, config, |_| Ok(series.clone()))
}
