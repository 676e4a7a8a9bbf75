//! Per-asset analysis: indicators, classifier, formatter.

use crate::error::PipelineError;
use crate::indicators::IndicatorEngine;
use crate::models::indicators::Candle;
use crate::models::signal::{RiskSettings, Signal};
use crate::signals::classifier::DirectionClassifier;
use crate::signals::formatter::format_signal;
use tracing::info;

pub struct SignalEngine;

impl SignalEngine {
    /// Run the analysis on a cleaned candle series.
    pub fn analyze(
        candles: &[Candle],
        market: &str,
        ticker: &str,
        risk: &RiskSettings,
    ) -> Result<Signal, PipelineError> {
        let rows = IndicatorEngine::compute(candles)?;
        let (direction, last) = DirectionClassifier::predict(&rows)?;
        let signal = format_signal(
            direction,
            last,
            market,
            ticker,
            risk.stop_fraction,
            risk.take_fraction,
        );

        info!(
            market = %market,
            ticker = %ticker,
            direction = %signal.direction,
            entry = signal.entry,
            "SignalEngine: {} signal for {}",
            signal.direction,
            ticker
        );

        Ok(signal)
    }
}
