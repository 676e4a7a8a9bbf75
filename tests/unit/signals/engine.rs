//! Unit tests for signal engine

use alpha_signals::models::indicators::Candle;
use alpha_signals::models::signal::RiskSettings;
use alpha_signals::signals::engine::SignalEngine;
use chrono::{Duration, TimeZone, Utc};

fn create_test_candles(count: usize, base_price: f64) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let price = base_price + (i as f64 * 0.9).sin() * base_price * 0.01;
            Candle::new(
                price,
                price * 1.001,
                price * 0.999,
                price,
                500.0,
                start + Duration::hours(i as i64),
            )
        })
        .collect()
}

#[test]
fn test_analyze_produces_signal_for_last_bar() {
    let candles = create_test_candles(120, 100.0);
    let signal = SignalEngine::analyze(&candles, "Stocks", "AAPL", &RiskSettings::default()).unwrap();

    let last = candles.last().unwrap();
    assert_eq!(signal.market, "Stocks");
    assert_eq!(signal.ticker, "AAPL");
    assert!((signal.entry - last.close).abs() < 1e-5);
    assert_eq!(signal.timestamp, "06/03/2024 11:00 UTC");
    assert!(signal.message.starts_with("🔔 Signal generated (Stocks)"));
}

#[test]
fn test_analyze_is_deterministic() {
    let candles = create_test_candles(200, 1.25);
    let risk = RiskSettings::default();
    let a = SignalEngine::analyze(&candles, "Forex", "GBPUSD=X", &risk).unwrap();
    let b = SignalEngine::analyze(&candles, "Forex", "GBPUSD=X", &risk).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_analyze_short_series() {
    let err = SignalEngine::analyze(&create_test_candles(34, 1.0), "Forex", "X", &RiskSettings::default())
        .unwrap_err();
    assert_eq!(err.kind(), "InsufficientHistory");
    assert!(err.is_skip());
}
