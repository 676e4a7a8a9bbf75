//! Job handlers for the analysis workflow

use crate::error::PipelineError;
use crate::jobs::context::JobContext;
use crate::jobs::types::AnalyzeAssetJob;
use crate::models::signal::{RiskSettings, Signal};
use crate::services::market_data::fetch_candles;
use crate::signals::engine::SignalEngine;
use std::time::Instant;
use tracing::{debug, error, info};

/// Handler for analysing one asset
///
/// Downloads and cleans the bars, then runs indicators, classifier and
/// formatter. Does not deliver the signal.
pub async fn handle_analyze_asset(
    job: &AnalyzeAssetJob,
    ctx: &JobContext,
    risk: &RiskSettings,
) -> Result<Signal, PipelineError> {
    let start = Instant::now();
    debug!(
        market = %job.market,
        ticker = %job.ticker,
        timeframe = %job.timeframe,
        "AnalyzeAssetJob: analysing {} ({})",
        job.ticker,
        job.timeframe
    );

    let candles = fetch_candles(
        ctx.data_provider.as_ref(),
        &job.ticker,
        &job.timeframe,
        &ctx.reference_timezone,
    )
    .await?;

    let signal = SignalEngine::analyze(&candles, &job.market, &job.ticker, risk)?;

    if let Some(ref metrics) = ctx.metrics {
        metrics.signals_generated_total.inc();
    }

    debug!(
        ticker = %job.ticker,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "AnalyzeAssetJob: {} analysed in {} ms",
        job.ticker,
        start.elapsed().as_millis()
    );

    Ok(signal)
}

/// Handler for delivering a signal
pub async fn handle_notify(signal: &Signal, ctx: &JobContext) -> Result<(), PipelineError> {
    match ctx.notifier.send(&signal.message).await {
        Ok(()) => {
            if let Some(ref metrics) = ctx.metrics {
                metrics.notifications_sent_total.inc();
            }
            info!(
                market = %signal.market,
                ticker = %signal.ticker,
                direction = %signal.direction,
                "Notifier: {} signal for {} sent",
                signal.direction,
                signal.ticker
            );
            Ok(())
        }
        Err(e) => {
            if let Some(ref metrics) = ctx.metrics {
                metrics.notification_failures_total.inc();
            }
            error!(
                market = %signal.market,
                ticker = %signal.ticker,
                error = %e,
                "Notifier: failed to deliver signal for {}",
                signal.ticker
            );
            Err(e.into())
        }
    }
}
