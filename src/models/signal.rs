use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    /// `true` means the next close is expected above the current one.
    pub fn from_prediction(up: bool) -> Self {
        if up {
            SignalDirection::Buy
        } else {
            SignalDirection::Sell
        }
    }

    /// Label used in chat messages.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "📈 Buy",
            SignalDirection::Sell => "📉 Sell",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalDirection::Buy => write!(f, "Buy"),
            SignalDirection::Sell => write!(f, "Sell"),
        }
    }
}

/// Stop-loss and take-profit distances as fractions of the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    pub stop_fraction: f64,
    pub take_fraction: f64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            stop_fraction: 0.003,
            take_fraction: 0.003,
        }
    }
}

/// Trade alert for one asset in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub market: String,
    pub ticker: String,
    pub direction: SignalDirection,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    /// Bar time rendered for humans (`DD/MM/YYYY HH:MM UTC`, `... Local` or `N/A`)
    pub timestamp: String,
    pub message: String,
}
