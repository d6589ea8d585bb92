//! Signal records emitted by the strategies.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    EntryLong,
    EntryShort,
    ExitLong,
    ExitShort,
    NoSignal,
}

impl SignalKind {
    pub fn is_entry(&self) -> bool {
        matches!(self, SignalKind::EntryLong | SignalKind::EntryShort)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, SignalKind::EntryLong | SignalKind::ExitLong)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::EntryLong => "entry_long",
            SignalKind::EntryShort => "entry_short",
            SignalKind::ExitLong => "exit_long",
            SignalKind::ExitShort => "exit_short",
            SignalKind::NoSignal => "no_signal",
        };
        f.write_str(s)
    }
}

/// Stop-loss, take-profit and size attached to entry signals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RiskParams {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub position_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub instrument: String,
    pub kind: SignalKind,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub position_size: f64,
    pub rationale: String,
    pub timestamp: NaiveDateTime,
}

impl Signal {
    /// A signal without risk parameters (exits and `NoSignal`).
    pub fn new(
        instrument: &str,
        kind: SignalKind,
        price: f64,
        rationale: String,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            instrument: instrument.to_string(),
            kind,
            price,
            stop_loss: 0.0,
            take_profit: 0.0,
            position_size: 0.0,
            rationale,
            timestamp,
        }
    }

    /// Attach risk parameters. Ignored for non-entry kinds, which always
    /// carry zeroed stop, target and size.
    pub fn with_risk(mut self, risk: RiskParams) -> Self {
        if self.kind.is_entry() {
            self.stop_loss = risk.stop_loss;
            self.take_profit = risk.take_profit;
            self.position_size = risk.position_size;
        }
        self
    }

    pub fn risk(&self) -> RiskParams {
        RiskParams {
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            position_size: self.position_size,
        }
    }
}

/// Percentage of `delta` relative to `base`; 0 when `base` is 0.
pub fn percent_of(delta: f64, base: f64) -> f64 {
    if base == 0.0 { 0.0 } else { delta / base * 100.0 }
}
