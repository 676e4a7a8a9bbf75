//! One analysis cycle over every configured market.

use crate::config::{Config, MarketCatalog};
use crate::error::PipelineError;
use crate::jobs::context::JobContext;
use crate::jobs::handlers::{handle_analyze_asset, handle_notify};
use crate::jobs::types::AnalyzeAssetJob;
use crate::models::signal::{RiskSettings, Signal};
use futures_util::FutureExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Configuration for the analysis runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub markets: Vec<String>,
    pub timeframe: String,
    pub risk: RiskSettings,
    pub asset_throttle: Duration,
    pub market_throttle: Duration,
    pub catalog: MarketCatalog,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            markets: vec!["Forex".to_string()],
            timeframe: "15m".to_string(),
            risk: RiskSettings::default(),
            asset_throttle: Duration::from_secs(3),
            market_throttle: Duration::from_secs(5),
            catalog: MarketCatalog::builtin(),
        }
    }
}

impl From<&Config> for RuntimeConfig {
    fn from(config: &Config) -> Self {
        Self {
            markets: config.markets.clone(),
            timeframe: config.timeframe.clone(),
            risk: config.risk,
            asset_throttle: config.asset_throttle,
            market_throttle: config.market_throttle,
            catalog: config.catalog.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetFailure {
    pub market: String,
    pub ticker: String,
    pub kind: &'static str,
    pub message: String,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub markets: usize,
    pub assets: usize,
    pub signals: Vec<Signal>,
    pub delivered: usize,
    pub failures: Vec<AssetFailure>,
    pub elapsed: Duration,
}

impl CycleReport {
    /// Failure counts keyed by error kind.
    pub fn failures_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs the per-asset pipeline for every market, sequentially.
pub struct SignalRuntime {
    config: RuntimeConfig,
    job_context: Arc<JobContext>,
}

impl SignalRuntime {
    pub fn new(config: RuntimeConfig, job_context: Arc<JobContext>) -> Self {
        Self {
            config,
            job_context,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Process every market once. Failures of single assets or markets are
    /// recorded in the report and never stop the cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        let mut report = CycleReport::default();

        info!(
            markets = ?self.config.markets,
            timeframe = %self.config.timeframe,
            "Runtime: starting cycle over {} market(s)",
            self.config.markets.len()
        );

        for (index, market) in self.config.markets.iter().enumerate() {
            if index > 0 {
                sleep(self.config.market_throttle).await;
            }

            let outcome = AssertUnwindSafe(self.run_market(market, &mut report))
                .catch_unwind()
                .await;
            if let Err(payload) = outcome {
                let message = panic_message(payload.as_ref());
                error!(
                    market = %market,
                    kind = "Unexpected",
                    error = %message,
                    "Runtime: market {} aborted: {}",
                    market,
                    message
                );
                report.failures.push(AssetFailure {
                    market: market.clone(),
                    ticker: String::new(),
                    kind: "Unexpected",
                    message,
                });
            }
            report.markets += 1;
        }

        report.elapsed = start.elapsed();
        self.record(&report);
        report
    }

    async fn run_market(&self, market: &str, report: &mut CycleReport) {
        let tickers = self.config.catalog.assets(market);
        if tickers.is_empty() {
            warn!(market = %market, "Runtime: market {} has no assets", market);
            return;
        }

        info!(
            market = %market,
            assets = tickers.len(),
            "Runtime: processing market {} ({} assets)",
            market,
            tickers.len()
        );

        for ticker in tickers {
            let job = AnalyzeAssetJob::new(market, ticker.as_str(), self.config.timeframe.as_str());
            report.assets += 1;

            let outcome = AssertUnwindSafe(self.run_asset(&job, report))
                .catch_unwind()
                .await;
            let result = match outcome {
                Ok(result) => result,
                Err(payload) => Err(PipelineError::Unexpected(format!(
                    "panic: {}",
                    panic_message(payload.as_ref())
                ))),
            };

            if let Err(e) = result {
                log_failure(&job, &e);
                report.failures.push(AssetFailure {
                    market: job.market.clone(),
                    ticker: job.ticker.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }

            sleep(self.config.asset_throttle).await;
        }
    }

    async fn run_asset(&self, job: &AnalyzeAssetJob, report: &mut CycleReport) -> Result<(), PipelineError> {
        let signal = handle_analyze_asset(job, &self.job_context, &self.config.risk).await?;
        report.signals.push(signal.clone());
        handle_notify(&signal, &self.job_context).await?;
        report.delivered += 1;
        Ok(())
    }

    fn record(&self, report: &CycleReport) {
        if let Some(ref metrics) = self.job_context.metrics {
            metrics.cycles_total.inc();
            metrics.assets_processed_total.inc_by(report.assets as u64);
            for failure in &report.failures {
                metrics.asset_failures_total.with_label_values(&[failure.kind]).inc();
            }
            metrics
                .cycle_duration_seconds
                .observe(report.elapsed.as_secs_f64());
        }

        info!(
            markets = report.markets,
            assets = report.assets,
            signals = report.signals.len(),
            delivered = report.delivered,
            failures = ?report.failures_by_kind(),
            elapsed_secs = report.elapsed.as_secs_f64(),
            "Runtime: cycle finished in {:.1}s ({} signals, {} delivered, {} failures)",
            report.elapsed.as_secs_f64(),
            report.signals.len(),
            report.delivered,
            report.failures.len()
        );
    }
}

fn log_failure(job: &AnalyzeAssetJob, e: &PipelineError) {
    if e.is_skip() {
        warn!(
            market = %job.market,
            ticker = %job.ticker,
            timeframe = %job.timeframe,
            kind = e.kind(),
            error = %e,
            "Runtime: skipping {}: {}",
            job.ticker,
            e
        );
    } else {
        error!(
            market = %job.market,
            ticker = %job.ticker,
            timeframe = %job.timeframe,
            kind = e.kind(),
            error = %e,
            "Runtime: {} failed: {}",
            job.ticker,
            e
        );
    }
}
