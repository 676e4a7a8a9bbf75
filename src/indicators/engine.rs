//! Indicator engine: augments a candle series with the classifier features.

use crate::error::PipelineError;
use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::calculate_ema;
use crate::indicators::volatility::calculate_bollinger_bands;
use crate::models::indicators::{Candle, IndicatorRow};
use tracing::debug;

/// Bars needed before any row can be fully defined (longest window).
pub const MIN_BARS: usize = 21;
/// Rows that must survive the warm-up drop.
pub const MIN_ROWS: usize = 10;

pub const EMA_FAST_PERIOD: u32 = 9;
pub const EMA_SLOW_PERIOD: u32 = 21;
pub const MACD_FAST_PERIOD: u32 = 12;
pub const MACD_SLOW_PERIOD: u32 = 26;
pub const RSI_PERIOD: u32 = 14;
pub const BOLLINGER_PERIOD: u32 = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Compute EMA 9/21, MACD, RSI 14 and Bollinger 20/2 for every bar and
    /// keep only the rows where all of them are defined.
    pub fn compute(candles: &[Candle]) -> Result<Vec<IndicatorRow>, PipelineError> {
        if candles.len() < MIN_BARS {
            debug!(
                bars = candles.len(),
                required = MIN_BARS,
                "IndicatorEngine: not enough bars ({} < {})",
                candles.len(),
                MIN_BARS
            );
            return Err(PipelineError::InsufficientHistory {
                stage: "indicators",
                available: candles.len(),
                required: MIN_BARS,
            });
        }

        let ema_fast = calculate_ema(candles, EMA_FAST_PERIOD);
        let ema_slow = calculate_ema(candles, EMA_SLOW_PERIOD);
        let macd = calculate_macd(candles, MACD_FAST_PERIOD, MACD_SLOW_PERIOD);
        let rsi = calculate_rsi(candles, RSI_PERIOD);
        let bands = calculate_bollinger_bands(candles, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);

        let rows: Vec<IndicatorRow> = candles
            .iter()
            .enumerate()
            .filter_map(|(i, candle)| {
                let band = bands[i]?;
                Some(IndicatorRow {
                    candle: candle.clone(),
                    ema_fast: ema_fast[i]?,
                    ema_slow: ema_slow[i]?,
                    macd: macd[i]?,
                    rsi: rsi[i]?,
                    bb_high: band.upper,
                    bb_mid: band.middle,
                    bb_low: band.lower,
                })
            })
            .filter(|row| row.undefined_features().is_empty())
            .collect();

        debug!(
            bars = candles.len(),
            rows = rows.len(),
            "IndicatorEngine: {} of {} rows fully defined",
            rows.len(),
            candles.len()
        );

        if rows.len() < MIN_ROWS {
            return Err(PipelineError::InsufficientHistory {
                stage: "warm-up",
                available: rows.len(),
                required: MIN_ROWS,
            });
        }

        Ok(rows)
    }
}
