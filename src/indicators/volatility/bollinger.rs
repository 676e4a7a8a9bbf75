//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::{BollingerBandsIndicator, Candle};

/// Calculate Bollinger Bands for every candle
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Vec<Option<BollingerBandsIndicator>> {
    let closes = math::closes(candles);
    let middles = math::sma_series(&closes, period as usize);
    let stds = math::std_series(&closes, period as usize);

    middles
        .into_iter()
        .zip(stds)
        .map(|(middle, std)| {
            let (middle, std) = (middle?, std?);
            Some(BollingerBandsIndicator {
                upper: middle + (std_dev * std),
                middle,
                lower: middle - (std_dev * std),
            })
        })
        .collect()
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Vec<Option<BollingerBandsIndicator>> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
