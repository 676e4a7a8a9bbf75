//! Alpha Signals Worker
//!
//! Runs the analysis cycle on a fixed interval and delivers every signal to
//! Telegram until interrupted.

use alpha_signals::config::Config;
use alpha_signals::core::runtime::{RuntimeConfig, SignalRuntime};
use alpha_signals::core::scheduler::JobScheduler;
use alpha_signals::jobs::context::JobContext;
use alpha_signals::logging;
use alpha_signals::metrics::Metrics;
use alpha_signals::services::market_data::MarketDataProvider;
use alpha_signals::services::telegram::{Notifier, TelegramNotifier, SEND_TIMEOUT};
use alpha_signals::services::yahoo::YahooFinanceProvider;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = Config::from_env()?;
    logging::init_logging(&config.log_path, &config.environment)?;

    info!("Starting Alpha Signals Worker");
    info!(environment = %config.environment, "Environment");

    let Some(credentials) = config.credentials() else {
        error!("Scheduler: TELEGRAM_TOKEN and TELEGRAM_CHAT_ID must both be set - exiting");
        return Err("missing Telegram credentials".into());
    };

    info!(
        markets = ?config.markets,
        timeframe = %config.timeframe,
        interval_secs = config.analysis_interval.as_secs(),
        log_path = %config.log_path.display(),
        "Markets: {} | timeframe {} | every {} minutes",
        config.markets.join(", "),
        config.timeframe,
        config.analysis_interval.as_secs() / 60
    );

    let metrics = Arc::new(Metrics::new()?);

    let provider: Arc<dyn MarketDataProvider + Send + Sync> = Arc::new(YahooFinanceProvider::new(
        &config.market_data_url,
        config.fetch_timeout,
    )?);
    let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(TelegramNotifier::new(
        &config.telegram_api_url,
        &credentials.token,
        credentials.chat_id,
        SEND_TIMEOUT,
    )?);

    let job_context = Arc::new(JobContext::new(
        provider,
        notifier,
        Some(metrics.clone()),
        config.reference_timezone.clone(),
    ));
    let runtime = SignalRuntime::new(RuntimeConfig::from(&config), job_context);
    let mut scheduler = JobScheduler::new(runtime, config.analysis_interval)?;

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        reason = scheduler.run() => {
            error!(error = %reason, "Scheduler terminated: {}", reason);
            if let Ok(text) = metrics.export() {
                info!(metrics = %text, "Final metrics");
            }
            Err(reason.into())
        }
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            Ok(())
        }
    }
}
