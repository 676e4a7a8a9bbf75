//! Prometheus metrics for the analysis worker

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub assets_processed_total: IntCounter,
    pub signals_generated_total: IntCounter,
    pub notifications_sent_total: IntCounter,
    pub notification_failures_total: IntCounter,
    pub asset_failures_total: IntCounterVec,
    pub cycle_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("cycles_total", "Completed analysis cycles")?;
        let assets_processed_total =
            IntCounter::new("assets_processed_total", "Assets run through the pipeline")?;
        let signals_generated_total =
            IntCounter::new("signals_generated_total", "Signals produced by the classifier")?;
        let notifications_sent_total =
            IntCounter::new("notifications_sent_total", "Signals delivered to the notifier")?;
        let notification_failures_total =
            IntCounter::new("notification_failures_total", "Signals the notifier failed to deliver")?;
        let asset_failures_total = IntCounterVec::new(
            Opts::new("asset_failures_total", "Assets that produced no signal, by error kind"),
            &["kind"],
        )?;
        let cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("cycle_duration_seconds", "Wall time of one analysis cycle")
                .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        )?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(assets_processed_total.clone()))?;
        registry.register(Box::new(signals_generated_total.clone()))?;
        registry.register(Box::new(notifications_sent_total.clone()))?;
        registry.register(Box::new(notification_failures_total.clone()))?;
        registry.register(Box::new(asset_failures_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            assets_processed_total,
            signals_generated_total,
            notifications_sent_total,
            notification_failures_total,
            asset_failures_total,
            cycle_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
