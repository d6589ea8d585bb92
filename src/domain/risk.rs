//! Stop-loss, take-profit and position sizing for entry signals.

use crate::domain::signal::{RiskParams, SignalKind};

/// Notional account size used for position sizing.
pub const ACCOUNT_SIZE: f64 = 100_000.0;

/// Take-profit distance as a multiple of the stop distance for Turtle entries.
pub const TURTLE_REWARD_RATIO: f64 = 2.0;

/// Units such that hitting the stop loses `risk_per_trade` of the account.
/// 0 when the stop sits on the price.
pub fn position_size(price: f64, stop_loss: f64, risk_per_trade: f64) -> f64 {
    let per_unit = (price - stop_loss).abs();
    if per_unit == 0.0 {
        return 0.0;
    }
    ACCOUNT_SIZE * risk_per_trade / per_unit
}

fn stop_for(kind: SignalKind, price: f64, distance: f64) -> f64 {
    if kind.is_long() { price - distance } else { price + distance }
}

/// Turtle entry: stop `atr * atr_multiplier` away, target at twice the
/// stop distance on the other side. Non-entry kinds get zeroed parameters.
pub fn turtle_risk(
    kind: SignalKind,
    price: f64,
    atr: f64,
    atr_multiplier: f64,
    risk_per_trade: f64,
) -> RiskParams {
    if !kind.is_entry() {
        return RiskParams::default();
    }
    let stop_loss = stop_for(kind, price, atr * atr_multiplier);
    RiskParams {
        stop_loss,
        take_profit: price + TURTLE_REWARD_RATIO * (price - stop_loss),
        position_size: position_size(price, stop_loss, risk_per_trade),
    }
}

/// Crossover entry: stop `atr * stop_multiplier` away, target at
/// `take_profit_ratio` times that distance.
pub fn crossover_risk(
    kind: SignalKind,
    price: f64,
    atr: f64,
    stop_multiplier: f64,
    take_profit_ratio: f64,
    risk_per_trade: f64,
) -> RiskParams {
    if !kind.is_entry() {
        return RiskParams::default();
    }
    let stop_distance = atr * stop_multiplier;
    let target_distance = stop_distance * take_profit_ratio;
    let (stop_loss, take_profit) = if kind.is_long() {
        (price - stop_distance, price + target_distance)
    } else {
        (price + stop_distance, price - target_distance)
    };
    RiskParams {
        stop_loss,
        take_profit,
        position_size: position_size(price, stop_loss, risk_per_trade),
    }
}
