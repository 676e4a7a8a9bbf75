//! Unit tests for MACD indicator

use alpha_signals::common::math::ema_series;
use alpha_signals::indicators::momentum::{calculate_macd, calculate_macd_default};
use alpha_signals::models::indicators::Candle;
use chrono::Utc;

fn create_test_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.3).sin() * 2.0 + i as f64 * 0.1;
            Candle::new(price, price + 0.5, price - 0.5, price, 1000.0, Utc::now())
        })
        .collect()
}

#[test]
fn test_macd_first_defined_at_slow_period() {
    let macd = calculate_macd_default(&create_test_candles(40));
    assert!(macd[24].is_none());
    assert!(macd[25].is_some());
}

#[test]
fn test_macd_is_fast_minus_slow() {
    let candles = create_test_candles(50);
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = ema_series(&closes, 12);
    let slow = ema_series(&closes, 26);
    let macd = calculate_macd(&candles, 12, 26);

    for i in 25..50 {
        let expected = fast[i].unwrap() - slow[i].unwrap();
        assert!((macd[i].unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn test_macd_positive_in_uptrend() {
    let candles: Vec<Candle> = (0..40)
        .map(|i| {
            let price = 100.0 + i as f64;
            Candle::new(price, price, price, price, 1.0, Utc::now())
        })
        .collect();
    let macd = calculate_macd_default(&candles);
    assert!(macd[39].unwrap() > 0.0);
}
