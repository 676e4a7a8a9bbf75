//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// Calculate RSI for every candle
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss, both smoothed with alpha = 1 / period.
/// When the average loss is zero the RSI is 100.
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; candles.len()];
    }

    let (gains, losses) = math::gains_and_losses(&math::closes(candles));
    let alpha = 1.0 / period as f64;
    let avg_gains = math::ewm_series(&gains, alpha, period as usize);
    let avg_losses = math::ewm_series(&losses, alpha, period as usize);

    avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(_), Some(loss)) if loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => Some(100.0 - (100.0 / (1.0 + gain / loss))),
            _ => None,
        })
        .collect()
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Vec<Option<f64>> {
    calculate_rsi(candles, 14)
}
