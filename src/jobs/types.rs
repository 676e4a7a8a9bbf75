//! Job types for the analysis workflow

use serde::{Deserialize, Serialize};

/// Analyse one asset of one market and notify on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeAssetJob {
    pub market: String,
    pub ticker: String,
    pub timeframe: String,
}

impl AnalyzeAssetJob {
    pub fn new(market: impl Into<String>, ticker: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            ticker: ticker.into(),
            timeframe: timeframe.into(),
        }
    }
}
