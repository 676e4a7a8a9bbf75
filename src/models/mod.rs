//! Shared data models spanning the pipeline stages.

pub mod indicators;
pub mod signal;

pub use indicators::{BarTimestamp, BollingerBandsIndicator, Candle, IndicatorRow, FEATURE_NAMES};
pub use signal::{RiskSettings, Signal, SignalDirection};
