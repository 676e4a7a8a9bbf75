//! Unit tests for the scheduler

use alpha_signals::core::runtime::{RuntimeConfig, SignalRuntime};
use alpha_signals::core::scheduler::{next_pause, JobScheduler, SchedulerError, SchedulerState};
use alpha_signals::jobs::context::JobContext;
use alpha_signals::services::market_data::{MarketDataProvider, QueryPlan, RawBar, SourceError};
use alpha_signals::services::telegram::{DeliveryError, Notifier};
use std::sync::Arc;
use std::time::Duration;

struct EmptyProvider;

#[async_trait::async_trait]
impl MarketDataProvider for EmptyProvider {
    async fn download(&self, _ticker: &str, _plan: &QueryPlan) -> Result<Vec<RawBar>, SourceError> {
        Ok(Vec::new())
    }
}

struct SilentNotifier;

#[async_trait::async_trait]
impl Notifier for SilentNotifier {
    async fn send(&self, _text: &str) -> Result<(), DeliveryError> {
        Ok(())
    }
}

fn runtime(markets: Vec<String>) -> SignalRuntime {
    let context = Arc::new(JobContext::new(
        Arc::new(EmptyProvider),
        Arc::new(SilentNotifier),
        None,
        "America/Sao_Paulo",
    ));
    SignalRuntime::new(
        RuntimeConfig {
            markets,
            asset_throttle: Duration::ZERO,
            market_throttle: Duration::ZERO,
            ..RuntimeConfig::default()
        },
        context,
    )
}

#[test]
fn test_next_pause_is_remaining_interval() {
    let interval = Duration::from_secs(600);
    assert_eq!(next_pause(interval, Duration::from_secs(180)), Duration::from_secs(420));
    assert_eq!(next_pause(interval, Duration::from_secs(600)), Duration::ZERO);
    assert_eq!(next_pause(interval, Duration::from_secs(900)), Duration::ZERO);
}

#[test]
fn test_zero_interval_rejected() {
    let result = JobScheduler::new(runtime(vec!["Forex".to_string()]), Duration::ZERO);
    assert!(matches!(result, Err(SchedulerError::ZeroInterval)));
}

#[tokio::test]
async fn test_empty_plan_terminates() {
    let mut scheduler = JobScheduler::new(runtime(Vec::new()), Duration::from_secs(60)).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Running);

    let reason = scheduler.run().await;
    assert!(matches!(reason, SchedulerError::EmptyPlan));
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
}

#[tokio::test]
async fn test_tick_runs_one_cycle() {
    let mut scheduler =
        JobScheduler::new(runtime(vec!["Crypto".to_string()]), Duration::from_secs(60)).unwrap();
    let report = scheduler.tick().await.unwrap();

    assert_eq!(report.markets, 1);
    assert_eq!(report.assets, 4);
    assert_eq!(report.failures_by_kind().get("NoData"), Some(&4));
    assert_eq!(scheduler.state(), SchedulerState::Running);
}
