//! Alpha Signals dry run
//!
//! Runs one analysis cycle over the configured markets and prints every signal
//! to stdout instead of sending it.

use alpha_signals::config::Config;
use alpha_signals::core::runtime::{RuntimeConfig, SignalRuntime};
use alpha_signals::jobs::context::JobContext;
use alpha_signals::logging;
use alpha_signals::metrics::Metrics;
use alpha_signals::services::telegram::ConsoleNotifier;
use alpha_signals::services::yahoo::YahooFinanceProvider;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_console_logging()?;

    let config = Config::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    let provider = YahooFinanceProvider::new(&config.market_data_url, config.fetch_timeout)?;

    let job_context = Arc::new(JobContext::new(
        Arc::new(provider),
        Arc::new(ConsoleNotifier),
        Some(metrics.clone()),
        config.reference_timezone.clone(),
    ));
    let runtime = SignalRuntime::new(RuntimeConfig::from(&config), job_context);

    let report = runtime.run_cycle().await;
    info!(
        signals = report.signals.len(),
        failures = ?report.failures_by_kind(),
        "Dry run finished"
    );
    print!("{}", metrics.export()?);

    Ok(())
}
