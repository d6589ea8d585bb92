//! Strategy configuration loading and validation.
//!
//! Reads the `[turtle]` and `[ma_crossover]` sections through a
//! [`ConfigPort`]. Missing keys fall back to the strategy defaults; only
//! enabled strategies are validated.

use crate::domain::error::SignalError;
use crate::domain::strategy::{
    MaCrossoverConfig, StrategyConfig, TrendFilter, TurtleConfig, VALID_TIMEFRAMES,
};
use crate::ports::config_port::ConfigPort;

pub const TURTLE_SECTION: &str = "turtle";
pub const MA_CROSSOVER_SECTION: &str = "ma_crossover";

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn read_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalError> {
    let value = config.get_int(section, key, default as i64);
    usize::try_from(value).map_err(|_| invalid(section, key, format!("{key} must not be negative")))
}

fn read_timeframe(config: &dyn ConfigPort, section: &str, default: &str) -> String {
    config
        .get_string(section, "timeframe")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn read_trend_filter(config: &dyn ConfigPort) -> Result<TrendFilter, SignalError> {
    match config.get_string(MA_CROSSOVER_SECTION, "trend_filter") {
        None => Ok(TrendFilter::None),
        Some(s) => s
            .parse()
            .map_err(|reason: String| invalid(MA_CROSSOVER_SECTION, "trend_filter", reason)),
    }
}

pub fn build_turtle_config(config: &dyn ConfigPort) -> Result<TurtleConfig, SignalError> {
    let d = TurtleConfig::default();
    let s = TURTLE_SECTION;
    Ok(TurtleConfig {
        enabled: config.get_bool(s, "enabled", d.enabled),
        timeframe: read_timeframe(config, s, &d.timeframe),
        lookback_period: read_count(config, s, "lookback_period", d.lookback_period)?,
        entry_breakout_days: read_count(config, s, "entry_breakout_days", d.entry_breakout_days)?,
        exit_breakout_days: read_count(config, s, "exit_breakout_days", d.exit_breakout_days)?,
        risk_per_trade: config.get_double(s, "risk_per_trade", d.risk_per_trade),
        atr_period: read_count(config, s, "atr_period", d.atr_period)?,
        atr_multiplier: config.get_double(s, "atr_multiplier", d.atr_multiplier),
    })
}

pub fn build_ma_crossover_config(config: &dyn ConfigPort) -> Result<MaCrossoverConfig, SignalError> {
    let d = MaCrossoverConfig::default();
    let s = MA_CROSSOVER_SECTION;
    Ok(MaCrossoverConfig {
        enabled: config.get_bool(s, "enabled", d.enabled),
        timeframe: read_timeframe(config, s, &d.timeframe),
        fast_period: read_count(config, s, "fast_period", d.fast_period)?,
        slow_period: read_count(config, s, "slow_period", d.slow_period)?,
        signal_period: read_count(config, s, "signal_period", d.signal_period)?,
        use_ema: config.get_bool(s, "use_ema", d.use_ema),
        use_volume_confirmation: config.get_bool(
            s,
            "use_volume_confirmation",
            d.use_volume_confirmation,
        ),
        min_volume_multiplier: config.get_double(s, "min_volume_multiplier", d.min_volume_multiplier),
        risk_per_trade: config.get_double(s, "risk_per_trade", d.risk_per_trade),
        stop_loss_atr_multiplier: config.get_double(
            s,
            "stop_loss_atr_multiplier",
            d.stop_loss_atr_multiplier,
        ),
        take_profit_ratio: config.get_double(s, "take_profit_ratio", d.take_profit_ratio),
        atr_period: read_count(config, s, "atr_period", d.atr_period)?,
        golden_cross: config.get_bool(s, "golden_cross", d.golden_cross),
        death_cross: config.get_bool(s, "death_cross", d.death_cross),
        require_confirmation: config.get_int(s, "require_confirmation", d.require_confirmation),
        trend_filter: read_trend_filter(config)?,
        rsi_filter: config.get_bool(s, "rsi_filter", d.rsi_filter),
        rsi_period: read_count(config, s, "rsi_period", d.rsi_period)?,
        rsi_overbought: config.get_double(s, "rsi_overbought", d.rsi_overbought),
        rsi_oversold: config.get_double(s, "rsi_oversold", d.rsi_oversold),
    })
}

/// Builds the immutable configuration snapshot handed to the engine.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, SignalError> {
    Ok(StrategyConfig {
        turtle: build_turtle_config(config)?,
        ma_crossover: build_ma_crossover_config(config)?,
    })
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let turtle = build_turtle_config(config)?;
    if turtle.enabled {
        validate_turtle(&turtle)?;
    }
    let ma = build_ma_crossover_config(config)?;
    if ma.enabled {
        validate_ma_crossover(&ma)?;
    }
    Ok(())
}

fn require_positive(section: &str, key: &str, value: usize) -> Result<(), SignalError> {
    if value == 0 {
        return Err(invalid(section, key, format!("{key} must be positive")));
    }
    Ok(())
}

fn require_positive_f64(section: &str, key: &str, value: f64) -> Result<(), SignalError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(section, key, format!("{key} must be positive")));
    }
    Ok(())
}

fn validate_risk_per_trade(section: &str, value: f64) -> Result<(), SignalError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(invalid(
            section,
            "risk_per_trade",
            "risk_per_trade must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_timeframe(section: &str, timeframe: &str) -> Result<(), SignalError> {
    if !VALID_TIMEFRAMES.contains(&timeframe) {
        return Err(invalid(
            section,
            "timeframe",
            format!(
                "unknown timeframe '{timeframe}' (expected one of {})",
                VALID_TIMEFRAMES.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_turtle(t: &TurtleConfig) -> Result<(), SignalError> {
    let s = TURTLE_SECTION;
    require_positive(s, "lookback_period", t.lookback_period)?;
    require_positive(s, "entry_breakout_days", t.entry_breakout_days)?;
    require_positive(s, "exit_breakout_days", t.exit_breakout_days)?;
    validate_risk_per_trade(s, t.risk_per_trade)?;
    require_positive(s, "atr_period", t.atr_period)?;
    require_positive_f64(s, "atr_multiplier", t.atr_multiplier)?;
    validate_timeframe(s, &t.timeframe)?;
    Ok(())
}

fn validate_ma_crossover(m: &MaCrossoverConfig) -> Result<(), SignalError> {
    let s = MA_CROSSOVER_SECTION;
    require_positive(s, "fast_period", m.fast_period)?;
    require_positive(s, "slow_period", m.slow_period)?;
    if m.fast_period >= m.slow_period {
        return Err(invalid(
            s,
            "fast_period",
            "fast_period must be less than slow_period",
        ));
    }
    validate_risk_per_trade(s, m.risk_per_trade)?;
    require_positive(s, "atr_period", m.atr_period)?;
    require_positive_f64(s, "stop_loss_atr_multiplier", m.stop_loss_atr_multiplier)?;
    require_positive_f64(s, "take_profit_ratio", m.take_profit_ratio)?;
    if !m.min_volume_multiplier.is_finite() || m.min_volume_multiplier < 0.0 {
        return Err(invalid(
            s,
            "min_volume_multiplier",
            "min_volume_multiplier must be a finite, non-negative number",
        ));
    }
    if m.require_confirmation < 0 {
        return Err(invalid(
            s,
            "require_confirmation",
            "require_confirmation must not be negative",
        ));
    }
    require_positive(s, "rsi_period", m.rsi_period)?;
    for (key, value) in [
        ("rsi_overbought", m.rsi_overbought),
        ("rsi_oversold", m.rsi_oversold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(s, key, format!("{key} must be between 0 and 100")));
        }
    }
    if m.rsi_oversold >= m.rsi_overbought {
        return Err(invalid(
            s,
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    validate_timeframe(s, &m.timeframe)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: SignalError) -> String {
        match err {
            SignalError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_builds_defaults() {
        let config = make_config("");
        let built = build_strategy_config(&config).unwrap();
        assert_eq!(built, StrategyConfig::default());
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn reads_both_sections() {
        let config = make_config(
            r#"
[turtle]
enabled = true
timeframe = 60
entry_breakout_days = 55
atr_multiplier = 1.5

[ma_crossover]
enabled = yes
fast_period = 5
slow_period = 21
signal_period = 9
use_ema = true
trend_filter = SMA200
require_confirmation = 2
rsi_overbought = 80
"#,
        );
        let built = build_strategy_config(&config).unwrap();
        assert!(built.turtle.enabled);
        assert_eq!(built.turtle.timeframe, "60");
        assert_eq!(built.turtle.entry_breakout_days, 55);
        assert_eq!(built.turtle.exit_breakout_days, 10);
        assert_eq!(built.turtle.atr_multiplier, 1.5);

        let ma = built.ma_crossover;
        assert!(ma.enabled);
        assert_eq!((ma.fast_period, ma.slow_period, ma.signal_period), (5, 21, 9));
        assert!(ma.use_ema);
        assert_eq!(ma.trend_filter, TrendFilter::Sma200);
        assert_eq!(ma.require_confirmation, 2);
        assert_eq!(ma.rsi_overbought, 80.0);
        assert_eq!(ma.rsi_oversold, 30.0);
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn negative_period_fails_to_build() {
        let config = make_config("[turtle]\nlookback_period = -5\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "lookback_period");
    }

    #[test]
    fn unknown_trend_filter_fails() {
        let config = make_config("[ma_crossover]\ntrend_filter = ema20\n");
        let err = build_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "trend_filter");
    }

    #[test]
    fn disabled_strategy_is_not_validated() {
        let config = make_config("[turtle]\nenabled = false\natr_period = 0\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn turtle_zero_days_fails() {
        let config = make_config("[turtle]\nenabled = true\nexit_breakout_days = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "exit_breakout_days");
    }

    #[test]
    fn turtle_risk_out_of_range_fails() {
        for risk in ["0", "1.5", "-0.1"] {
            let config = make_config(&format!("[turtle]\nenabled = true\nrisk_per_trade = {risk}\n"));
            let err = validate_strategy_config(&config).unwrap_err();
            assert_eq!(invalid_key(err), "risk_per_trade");
        }
    }

    #[test]
    fn turtle_risk_of_one_passes() {
        let config = make_config("[turtle]\nenabled = true\nrisk_per_trade = 1\n");
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn turtle_bad_multiplier_fails() {
        let config = make_config("[turtle]\nenabled = true\natr_multiplier = 0\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "atr_multiplier");
    }

    #[test]
    fn unknown_timeframe_fails() {
        let config = make_config("[turtle]\nenabled = true\ntimeframe = 15\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "timeframe");
    }

    #[test]
    fn fast_must_be_below_slow() {
        let config = make_config("[ma_crossover]\nenabled = true\nfast_period = 30\nslow_period = 30\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "fast_period");
    }

    #[test]
    fn rsi_thresholds_checked() {
        let config = make_config("[ma_crossover]\nenabled = true\nrsi_overbought = 120\n");
        assert_eq!(
            invalid_key(validate_strategy_config(&config).unwrap_err()),
            "rsi_overbought"
        );

        let config =
            make_config("[ma_crossover]\nenabled = true\nrsi_overbought = 40\nrsi_oversold = 60\n");
        assert_eq!(
            invalid_key(validate_strategy_config(&config).unwrap_err()),
            "rsi_oversold"
        );
    }

    #[test]
    fn negative_confirmation_fails() {
        let config = make_config("[ma_crossover]\nenabled = true\nrequire_confirmation = -1\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "require_confirmation");
    }

    #[test]
    fn negative_volume_multiplier_fails() {
        let config = make_config("[ma_crossover]\nenabled = true\nmin_volume_multiplier = -2\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert_eq!(invalid_key(err), "min_volume_multiplier");
    }

    #[test]
    fn validate_rejects_non_finite() {
        let cases = [
            ("[turtle]\nenabled = true\nrisk_per_trade = nan\n", "risk_per_trade"),
            ("[turtle]\nenabled = true\natr_multiplier = inf\n", "atr_multiplier"),
            (
                "[ma_crossover]\nenabled = true\nstop_loss_atr_multiplier = inf\n",
                "stop_loss_atr_multiplier",
            ),
            ("[ma_crossover]\nenabled = true\ntake_profit_ratio = inf\n", "take_profit_ratio"),
            (
                "[ma_crossover]\nenabled = true\nmin_volume_multiplier = nan\n",
                "min_volume_multiplier",
            ),
        ];
        for (ini, key) in cases {
            let err = validate_strategy_config(&make_config(ini)).unwrap_err();
            assert_eq!(invalid_key(err), key, "config: {ini}");
        }
    }
}
