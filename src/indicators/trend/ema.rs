//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate EMA for every candle
///
/// alpha = 2 / (period + 1), seeded with the first close.
/// The first `period - 1` values are undefined.
pub fn calculate_ema(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    math::ema_series(&math::closes(candles), period as usize)
}

