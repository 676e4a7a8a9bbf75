//! Unit tests for signal runtime

use alpha_signals::config::{Config, MarketCatalog};
use alpha_signals::core::runtime::{panic_message, AssetFailure, CycleReport, RuntimeConfig};
use std::collections::HashMap;
use std::time::Duration;

#[test]
fn test_runtime_config_default() {
    let config = RuntimeConfig::default();
    assert_eq!(config.markets, vec!["Forex".to_string()]);
    assert_eq!(config.timeframe, "15m");
    assert_eq!(config.asset_throttle, Duration::from_secs(3));
    assert_eq!(config.market_throttle, Duration::from_secs(5));
    assert_eq!(config.catalog, MarketCatalog::builtin());
}

#[test]
fn test_runtime_config_from_config() {
    let vars: HashMap<&str, &str> = [
        ("MARKETS", "Crypto,Stocks"),
        ("WORKER_TIMEFRAME", "1h"),
        ("ASSET_THROTTLE_SECONDS", "0"),
        ("DEFAULT_STOP_DEV", "0.01"),
    ]
    .into_iter()
    .collect();
    let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

    let runtime_config = RuntimeConfig::from(&config);
    assert_eq!(runtime_config.markets, vec!["Crypto".to_string(), "Stocks".to_string()]);
    assert_eq!(runtime_config.timeframe, "1h");
    assert_eq!(runtime_config.asset_throttle, Duration::ZERO);
    assert_eq!(runtime_config.risk.stop_fraction, 0.01);
}

#[test]
fn test_failures_grouped_by_kind() {
    let failure = |ticker: &str, kind: &'static str| AssetFailure {
        market: "Forex".to_string(),
        ticker: ticker.to_string(),
        kind,
        message: String::new(),
    };
    let report = CycleReport {
        failures: vec![
            failure("A", "NoData"),
            failure("B", "DeliveryError"),
            failure("C", "NoData"),
        ],
        ..CycleReport::default()
    };

    let counts = report.failures_by_kind();
    assert_eq!(counts.get("NoData"), Some(&2));
    assert_eq!(counts.get("DeliveryError"), Some(&1));
    assert_eq!(counts.get("Unexpected"), None);
}

#[test]
fn test_panic_message_payloads() {
    let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "boom");

    let payload = std::panic::catch_unwind(|| panic!("{} failed", "asset")).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "asset failed");

    let payload = std::panic::catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
}
