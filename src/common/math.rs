//! Series math used by the indicators.
//!
//! Every function returns one entry per input value. Entries that do not have
//! enough history yet are `None`.

use crate::models::indicators::Candle;

/// Extract close prices from a slice of candles.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Next EMA value given the previous one.
pub fn ema_from_previous(value: f64, previous: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// Exponentially weighted mean in recursive form, seeded with the first value.
///
/// Values before index `min_periods - 1` are `None`.
pub fn ewm_series(values: &[f64], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut previous: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        let current = match previous {
            Some(p) => ema_from_previous(value, p, alpha),
            None => value,
        };
        previous = Some(current);
        out.push((i + 1 >= min_periods.max(1)).then_some(current));
    }

    out
}

/// EMA with `alpha = 2 / (period + 1)`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    ewm_series(values, 2.0 / (period as f64 + 1.0), period)
}

/// Rolling simple moving average.
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, mean)
}

/// Rolling population standard deviation (ddof = 0).
pub fn std_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, population_std)
}

fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| (i + 1 >= period).then(|| f(&values[i + 1 - period..=i])))
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Split close-to-close changes into gains and losses.
///
/// The first entry has no predecessor and counts as no change.
pub fn gains_and_losses(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let change = if i == 0 { 0.0 } else { values[i] - values[i - 1] };
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change.min(0.0));
        }
    }

    (gains, losses)
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
