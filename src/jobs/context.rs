//! Job context for dependency injection

use crate::metrics::Metrics;
use crate::services::market_data::MarketDataProvider;
use crate::services::telegram::Notifier;
use std::sync::Arc;

/// Collaborators shared by every job of a worker.
///
/// Contains:
/// - Market data provider (downloads bars per asset)
/// - Notifier (delivers formatted signals)
/// - Metrics (optional, for tracking analysis statistics)
pub struct JobContext {
    pub data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
    pub notifier: Arc<dyn Notifier + Send + Sync>,
    pub metrics: Option<Arc<Metrics>>,
    pub reference_timezone: String,
}

impl JobContext {
    pub fn new(
        data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        metrics: Option<Arc<Metrics>>,
        reference_timezone: impl Into<String>,
    ) -> Self {
        Self {
            data_provider,
            notifier,
            metrics,
            reference_timezone: reference_timezone.into(),
        }
    }
}
