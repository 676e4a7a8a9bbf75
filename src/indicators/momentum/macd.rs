//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate the MACD line for every candle
///
/// MACD = EMA(fast) - EMA(slow), defined once the slow EMA is.
pub fn calculate_macd(candles: &[Candle], fast_period: u32, slow_period: u32) -> Vec<Option<f64>> {
    let closes = math::closes(candles);
    let fast = math::ema_series(&closes, fast_period as usize);
    let slow = math::ema_series(&closes, slow_period as usize);

    fast.into_iter()
        .zip(slow)
        .map(|(fast, slow)| Some(fast? - slow?))
        .collect()
}

/// Calculate MACD with default periods (12, 26)
pub fn calculate_macd_default(candles: &[Candle]) -> Vec<Option<f64>> {
    calculate_macd(candles, 12, 26)
}
