//! Human-readable rationale text for emitted signals.

use chrono::NaiveDateTime;

use crate::domain::breakout::{BreakoutLevels, ChannelLevel};
use crate::domain::crossover::{CrossDirection, CrossoverCandidate, CrossoverIndicators};
use crate::domain::signal::{percent_of, RiskParams, SignalKind};

const DATE_FORMAT: &str = "%d.%m.%Y";
const SHORT_DATE_FORMAT: &str = "%d.%m";

fn level_label(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::EntryLong => "long entry breakout",
        SignalKind::EntryShort => "short entry breakout",
        SignalKind::ExitLong => "long exit breakout",
        SignalKind::ExitShort => "short exit breakout",
        SignalKind::NoSignal => "no breakout",
    }
}

/// "price vs level" line shared by Turtle entries and exits.
fn breakout_line(kind: SignalKind, price: f64, level: &ChannelLevel) -> String {
    let upward = matches!(kind, SignalKind::EntryLong | SignalKind::ExitShort);
    let (sign, word, distance) = if upward {
        (">", "above", price - level.value)
    } else {
        ("<", "below", level.value - price)
    };
    format!(
        "{}: {:.2} (set {})\nprice {:.2} {} {:.2} ({} by {:.2} / {:.2}%)",
        level_label(kind),
        level.value,
        level.set_at.format(DATE_FORMAT),
        price,
        sign,
        level.value,
        word,
        distance,
        percent_of(distance, level.value),
    )
}

pub fn turtle_entry_rationale(
    kind: SignalKind,
    price: f64,
    level: &ChannelLevel,
    atr: f64,
    risk: &RiskParams,
) -> String {
    format!(
        "{}\nATR {:.2} | stop-loss {:.2} ({:.2}% of price)\ntake-profit {:.2} (risk:reward = 1:2)",
        breakout_line(kind, price, level),
        atr,
        risk.stop_loss,
        percent_of((price - risk.stop_loss).abs(), price),
        risk.take_profit,
    )
}

/// Exit text, including how many whole days the level has held.
pub fn turtle_exit_rationale(
    kind: SignalKind,
    price: f64,
    level: &ChannelLevel,
    now: NaiveDateTime,
) -> String {
    let held = (now - level.set_at).num_days();
    format!(
        "{}\nlevel held for {} days",
        breakout_line(kind, price, level),
        held
    )
}

/// Diagnostic text when no breakout fired: current levels and the distance
/// from the price to each of them.
pub fn turtle_no_signal_rationale(
    instrument: &str,
    price: f64,
    atr: f64,
    levels: &BreakoutLevels,
) -> String {
    let date = |l: &ChannelLevel| l.set_at.format(SHORT_DATE_FORMAT).to_string();
    let to_entry_long = levels.entry_high.value - price;
    let to_entry_short = price - levels.entry_low.value;
    let to_exit_long = price - levels.exit_low.value;
    let to_exit_short = levels.exit_high.value - price;

    let mut out = format!("analysis of {instrument}\n\n");
    out.push_str(&format!("current:\n  price {price:.2}\n  ATR {atr:.2}\n\n"));
    out.push_str(&format!(
        "entry levels:\n  buy above {:.2} ({})\n  sell below {:.2} ({})\n\n",
        levels.entry_high.value,
        date(&levels.entry_high),
        levels.entry_low.value,
        date(&levels.entry_low),
    ));
    out.push_str(&format!(
        "exit levels:\n  exit long below {:.2} ({})\n  exit short above {:.2} ({})\n\n",
        levels.exit_low.value,
        date(&levels.exit_low),
        levels.exit_high.value,
        date(&levels.exit_high),
    ));
    out.push_str("distance to levels:\n");
    for (label, distance) in [
        ("long entry", to_entry_long),
        ("short entry", to_entry_short),
        ("long exit", to_exit_long),
        ("short exit", to_exit_short),
    ] {
        out.push_str(&format!(
            "  {label}: {distance:.2} ({:.2}%)\n",
            percent_of(distance, price)
        ));
    }
    out.push_str("\nwaiting for a breakout");
    out
}

pub fn crossover_rationale(
    candidate: &CrossoverCandidate,
    indicators: &CrossoverIndicators,
    price: f64,
) -> String {
    let (name, verb) = match candidate.direction {
        CrossDirection::Golden => ("golden cross", "crosses above"),
        CrossDirection::Death => ("death cross", "crosses below"),
    };
    let mut out = format!(
        "{name}: {} = {:.2} {verb} {} = {:.2}\nprice {price:.2} | MA gap {:.2}%\nconfirmed by {} bars",
        indicators.fast_type,
        candidate.fast,
        indicators.slow_type,
        candidate.slow,
        candidate.gap_pct,
        candidate.confirmations,
    );
    if let Some(value) = indicators
        .signal
        .as_ref()
        .and_then(|s| s.get(candidate.index))
    {
        out.push_str(&format!("\nsignal MA {value:.2}"));
    }
    out
}

/// Risk block appended to crossover entries.
pub fn risk_note(price: f64, risk: &RiskParams, take_profit_ratio: f64, atr: f64) -> String {
    format!(
        "\n\nrisk management:\n  stop-loss {:.2} ({:.1}%)\n  take-profit {:.2} (risk:reward = 1:{:.1})\n  position size {:.0} units\n  ATR {:.2}",
        risk.stop_loss,
        percent_of((price - risk.stop_loss).abs(), price),
        risk.take_profit,
        take_profit_ratio,
        risk.position_size,
        atr,
    )
}
