//! Unit tests for the indicator engine

use alpha_signals::error::PipelineError;
use alpha_signals::indicators::engine::{IndicatorEngine, MIN_BARS, MIN_ROWS};
use alpha_signals::models::indicators::Candle;
use chrono::{Duration, TimeZone, Utc};

fn create_test_candles(count: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let price = 1.1 + (i as f64 * 0.4).sin() * 0.01 + i as f64 * 0.0005;
            Candle::new(
                price,
                price + 0.001,
                price - 0.001,
                price,
                1000.0,
                start + Duration::minutes(15 * i as i64),
            )
        })
        .collect()
}

#[test]
fn test_rejects_fewer_than_min_bars() {
    let err = IndicatorEngine::compute(&create_test_candles(MIN_BARS - 1)).unwrap_err();
    match err {
        PipelineError::InsufficientHistory {
            stage,
            available,
            required,
        } => {
            assert_eq!(stage, "indicators");
            assert_eq!(available, 20);
            assert_eq!(required, 21);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rejects_too_few_rows_after_warm_up() {
    // MACD is first defined at bar 25, so 30 bars leave 5 rows.
    let err = IndicatorEngine::compute(&create_test_candles(30)).unwrap_err();
    match err {
        PipelineError::InsufficientHistory {
            stage, available, ..
        } => {
            assert_eq!(stage, "warm-up");
            assert_eq!(available, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_drops_warm_up_rows() {
    let candles = create_test_candles(60);
    let rows = IndicatorEngine::compute(&candles).unwrap();

    assert_eq!(rows.len(), 35);
    assert!(rows.len() >= MIN_ROWS);
    assert_eq!(rows[0].candle, candles[25]);
    assert_eq!(rows.last().unwrap().candle, candles[59]);
}

#[test]
fn test_rows_are_fully_defined() {
    let rows = IndicatorEngine::compute(&create_test_candles(80)).unwrap();
    for row in &rows {
        assert!(row.undefined_features().is_empty());
        assert!(row.bb_low <= row.bb_mid && row.bb_mid <= row.bb_high);
        assert!((0.0..=100.0).contains(&row.rsi));
    }
}

#[test]
fn test_minimum_series_for_ten_rows() {
    assert_eq!(IndicatorEngine::compute(&create_test_candles(35)).unwrap().len(), 10);
}
