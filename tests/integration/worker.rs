//! Integration tests for the Worker
//!
//! Full analysis cycles with stubbed market data and notifier.


use alpha_signals::core::runtime::SignalRuntime;
use alpha_signals::core::scheduler::{JobScheduler, SchedulerState};
use alpha_signals::jobs::context::JobContext;
use alpha_signals::jobs::handlers::handle_analyze_asset;
use alpha_signals::jobs::types::AnalyzeAssetJob;
use alpha_signals::models::signal::RiskSettings;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{create_test_bars, Feed, RecordingNotifier, StubProvider, TestWorker};

#[tokio::test]
async fn delivers_signal_for_every_asset() {
    let provider = StubProvider::default()
        .with("EURUSD=X", Feed::Bars(create_test_bars(120, 1.1)))
        .with("GBPUSD=X", Feed::Bars(create_test_bars(120, 1.27)));
    let worker = TestWorker::new(
        &[("Forex", &["EURUSD=X", "GBPUSD=X"])],
        provider,
        RecordingNotifier::default(),
    );

    let report = worker.runtime.run_cycle().await;

    assert_eq!(report.markets, 1);
    assert_eq!(report.assets, 2);
    assert_eq!(report.signals.len(), 2);
    assert_eq!(report.delivered, 2);
    assert!(report.failures.is_empty());

    let messages = worker.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("Asset: EURUSD=X"));
    assert!(messages[1].contains("Asset: GBPUSD=X"));
    assert!(messages.iter().all(|m| m.starts_with("🔔 Signal generated (Forex)")));
}

#[tokio::test]
async fn delivery_failure_does_not_stop_cycle() {
    let provider = StubProvider::default()
        .with("BTC-USD", Feed::Bars(create_test_bars(100, 40_000.0)))
        .with("ETH-USD", Feed::Bars(create_test_bars(100, 2_500.0)));
    let worker = TestWorker::new(
        &[("Crypto", &["BTC-USD", "ETH-USD"])],
        provider,
        RecordingNotifier::failing(),
    );

    let report = worker.runtime.run_cycle().await;

    assert_eq!(report.signals.len(), 2);
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|f| f.kind == "DeliveryError"));
    assert_eq!(worker.notifier.messages().len(), 2);
    assert_eq!(*worker.provider.requests.lock().unwrap(), vec!["BTC-USD", "ETH-USD"]);
}

#[tokio::test]
async fn failures_are_isolated_per_asset() {
    let provider = StubProvider::default()
        .with("AAA", Feed::Fail)
        .with("BBB", Feed::Panic)
        .with("CCC", Feed::Bars(create_test_bars(30, 10.0)))
        .with("DDD", Feed::Bars(create_test_bars(80, 10.0)));
    // "EEE" has no feed and returns no rows.
    let worker = TestWorker::new(
        &[("Stocks", &["AAA", "BBB", "CCC", "DDD", "EEE"])],
        provider,
        RecordingNotifier::default(),
    );

    let report = worker.runtime.run_cycle().await;

    assert_eq!(report.assets, 5);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.signals[0].ticker, "DDD");

    let kinds: Vec<(&str, &str)> = report
        .failures
        .iter()
        .map(|f| (f.ticker.as_str(), f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("AAA", "Unexpected"),
            ("BBB", "Unexpected"),
            ("CCC", "InsufficientHistory"),
            ("EEE", "NoData"),
        ]
    );
    assert!(report.failures[1].message.contains("provider exploded"));
}

#[tokio::test]
async fn markets_processed_in_order() {
    let provider = StubProvider::default()
        .with("GC=F", Feed::Bars(create_test_bars(60, 2_000.0)))
        .with("AAPL", Feed::Bars(create_test_bars(60, 180.0)));
    let worker = TestWorker::new(
        &[("Commodities", &["GC=F"]), ("Empty", &[]), ("Stocks", &["AAPL"])],
        provider,
        RecordingNotifier::default(),
    );

    let report = worker.runtime.run_cycle().await;

    assert_eq!(report.markets, 3);
    assert_eq!(report.delivered, 2);
    let markets: Vec<&str> = report.signals.iter().map(|s| s.market.as_str()).collect();
    assert_eq!(markets, vec!["Commodities", "Stocks"]);
}

#[tokio::test]
async fn unknown_market_is_skipped() {
    let worker = TestWorker::new(&[], StubProvider::default(), RecordingNotifier::default());
    let mut config = worker.runtime.config().clone();
    config.markets = vec!["Bonds".to_string()];

    let context = Arc::new(JobContext::new(
        worker.provider.clone(),
        worker.notifier.clone(),
        None,
        "America/Sao_Paulo",
    ));
    let report = SignalRuntime::new(config, context).run_cycle().await;

    assert_eq!(report.markets, 1);
    assert_eq!(report.assets, 0);
    assert!(worker.provider.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cycle_updates_metrics() {
    let provider = StubProvider::default().with("EURUSD=X", Feed::Bars(create_test_bars(90, 1.1)));
    let worker = TestWorker::new(
        &[("Forex", &["EURUSD=X", "USDJPY=X"])],
        provider,
        RecordingNotifier::failing(),
    );

    worker.runtime.run_cycle().await;
    let text = worker.metrics.export().unwrap();

    assert!(text.contains("cycles_total 1"));
    assert!(text.contains("assets_processed_total 2"));
    assert!(text.contains("signals_generated_total 1"));
    assert!(text.contains("notification_failures_total 1"));
    assert!(text.contains(r#"asset_failures_total{kind="DeliveryError"} 1"#));
    assert!(text.contains(r#"asset_failures_total{kind="NoData"} 1"#));
}

#[tokio::test]
async fn scheduler_tick_runs_cycle() {
    let provider = StubProvider::default().with("SI=F", Feed::Bars(create_test_bars(70, 23.0)));
    let worker = TestWorker::new(&[("Commodities", &["SI=F"])], provider, RecordingNotifier::default());

    let mut scheduler = JobScheduler::new(worker.runtime, Duration::from_secs(600)).unwrap();
    let report = scheduler.tick().await.unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert_eq!(worker.notifier.messages().len(), 1);
}

#[tokio::test]
async fn analyze_handler_returns_signal_without_sending() {
    let provider = Arc::new(StubProvider::default().with("AUDUSD=X", Feed::Bars(create_test_bars(60, 0.66))));
    let notifier = Arc::new(RecordingNotifier::default());
    let context = JobContext::new(provider, notifier.clone(), None, "America/Sao_Paulo");

    let job = AnalyzeAssetJob::new("Forex", "AUDUSD=X", "15m");
    let signal = handle_analyze_asset(&job, &context, &RiskSettings::default()).await.unwrap();

    assert_eq!(signal.ticker, "AUDUSD=X");
    assert!(signal.timestamp.ends_with("UTC"));
    assert!(notifier.messages().is_empty());
}
