//! Pipeline error kinds.
//!
//! Every stage of the per-asset pipeline returns `PipelineError`. The runtime
//! turns each one into a single log record and moves on to the next asset.

use crate::services::market_data::SourceError;
use crate::services::telegram::DeliveryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no usable data for {ticker} ({timeframe}): {reason}")]
    NoData {
        ticker: String,
        timeframe: String,
        reason: &'static str,
    },

    #[error("insufficient history for {stage}: {available} < {required}")]
    InsufficientHistory {
        stage: &'static str,
        available: usize,
        required: usize,
    },

    #[error("prediction row has undefined features: {}", features.join(", "))]
    UndefinedFeatures { features: Vec<&'static str> },

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("market data source failed: {0}")]
    Source(#[from] SourceError),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Stable name of the error kind, used as a log field and metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NoData { .. } => "NoData",
            PipelineError::InsufficientHistory { .. } => "InsufficientHistory",
            PipelineError::UndefinedFeatures { .. } => "UndefinedFeatures",
            PipelineError::Delivery(_) => "DeliveryError",
            PipelineError::Source(_) | PipelineError::Unexpected(_) => "Unexpected",
        }
    }

    /// The asset is skipped for this cycle because its data cannot support a
    /// prediction, as opposed to something having gone wrong.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            PipelineError::NoData { .. }
                | PipelineError::InsufficientHistory { .. }
                | PipelineError::UndefinedFeatures { .. }
        )
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
