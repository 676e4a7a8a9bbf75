//! Market data provider interface and the fetch step of the pipeline.
//!
//! Providers return raw rows; `fetch_candles` picks the lookback window, cleans
//! the rows and moves every timestamp into the reference timezone.

use crate::error::PipelineError;
use crate::models::indicators::{BarTimestamp, Candle};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, warn};

pub const MONTHLY_INTERVAL: &str = "1mo";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error {code}: {description}")]
    Api { code: String, description: String },
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for SourceError {
    fn from(e: url::ParseError) -> Self {
        SourceError::InvalidUrl(e.to_string())
    }
}

/// How far back to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(u32),
    Months(u32),
    Years(u32),
    Max,
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookback::Days(n) => write!(f, "{}d", n),
            Lookback::Months(n) => write!(f, "{}mo", n),
            Lookback::Years(n) => write!(f, "{}y", n),
            Lookback::Max => write!(f, "max"),
        }
    }
}

/// Interval and lookback sent to the data source for a timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub interval: String,
    pub range: Lookback,
}

impl QueryPlan {
    /// Intraday timeframes look back 60 days, hourly 730 days, daily 5 years,
    /// weekly 10 years and monthly as far as the source goes. Anything else is
    /// queried as monthly bars over one month.
    pub fn for_timeframe(timeframe: &str) -> Self {
        let range = match timeframe {
            "15m" | "30m" => Lookback::Days(60),
            "1h" | "4h" => Lookback::Days(730),
            "1d" => Lookback::Years(5),
            "1wk" => Lookback::Years(10),
            "1mo" => Lookback::Max,
            _ => {
                return Self {
                    interval: MONTHLY_INTERVAL.to_string(),
                    range: Lookback::Months(1),
                }
            }
        };

        Self {
            interval: timeframe.to_string(),
            range,
        }
    }
}

/// A row as delivered by the source; any field may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: BarTimestamp,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// `None` when any field is missing or not finite.
    pub fn into_candle(self) -> Option<Candle> {
        let present = |v: Option<f64>| v.filter(|x| x.is_finite());
        Some(Candle::new(
            present(self.open)?,
            present(self.high)?,
            present(self.low)?,
            present(self.close)?,
            present(self.volume)?,
            self.timestamp,
        ))
    }
}

#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Download raw bars for a ticker. An empty vector means the source had no rows.
    async fn download(&self, ticker: &str, plan: &QueryPlan) -> Result<Vec<RawBar>, SourceError>;
}

#[derive(Debug, Error)]
#[error("unknown reference timezone '{zone}': {reason}")]
pub struct TimezoneError {
    pub zone: String,
    pub reason: String,
}

/// Drop incomplete rows, order by time and collapse repeated timestamps,
/// keeping the bar delivered last.
pub fn clean_bars(raw: Vec<RawBar>) -> Vec<Candle> {
    let mut candles: Vec<Candle> = raw.into_iter().filter_map(RawBar::into_candle).collect();
    // Stable, so delivery order decides among equal timestamps.
    candles.sort_by_key(|c| c.timestamp.sort_key());
    candles.dedup_by(|next, kept| {
        if next.timestamp.same_bar(&kept.timestamp) {
            std::mem::swap(next, kept);
            true
        } else {
            false
        }
    });
    candles
}

/// Convert every timestamp to `zone`. Naive timestamps are taken as UTC.
pub fn normalize_timezone(candles: &[Candle], zone: &str) -> Result<Vec<Candle>, TimezoneError> {
    let tz: Tz = zone.parse().map_err(|e| TimezoneError {
        zone: zone.to_string(),
        reason: format!("{}", e),
    })?;

    Ok(candles
        .iter()
        .map(|candle| {
            let timestamp = match &candle.timestamp {
                BarTimestamp::Zoned(dt) => BarTimestamp::Zoned(dt.with_timezone(&tz)),
                BarTimestamp::Naive(naive) => {
                    BarTimestamp::Zoned(Utc.from_utc_datetime(naive).with_timezone(&tz))
                }
                BarTimestamp::Invalid => BarTimestamp::Invalid,
            };
            Candle {
                timestamp,
                ..candle.clone()
            }
        })
        .collect())
}

/// Fetch a cleaned, timezone-normalised candle series for `ticker`.
///
/// If the timezone conversion fails the cleaned bars are returned unconverted.
pub async fn fetch_candles(
    provider: &(dyn MarketDataProvider + Send + Sync),
    ticker: &str,
    timeframe: &str,
    reference_timezone: &str,
) -> Result<Vec<Candle>, PipelineError> {
    let plan = QueryPlan::for_timeframe(timeframe);
    if plan.interval != timeframe {
        warn!(
            ticker = %ticker,
            timeframe = %timeframe,
            "Fetcher: unrecognised timeframe '{}', querying {} bars over {}",
            timeframe,
            plan.interval,
            plan.range
        );
    }

    info!(
        ticker = %ticker,
        interval = %plan.interval,
        range = %plan.range,
        "Fetcher: downloading {} | interval {} | range {}",
        ticker,
        plan.interval,
        plan.range
    );

    let raw = provider.download(ticker, &plan).await?;
    if raw.is_empty() {
        error!(ticker = %ticker, timeframe = %timeframe, "Fetcher: source returned no rows for {}", ticker);
        return Err(PipelineError::NoData {
            ticker: ticker.to_string(),
            timeframe: timeframe.to_string(),
            reason: "source returned no rows",
        });
    }

    let raw_rows = raw.len();
    let candles = clean_bars(raw);
    if candles.is_empty() {
        error!(
            ticker = %ticker,
            rows = raw_rows,
            "Fetcher: all {} rows for {} had missing fields",
            raw_rows,
            ticker
        );
        return Err(PipelineError::NoData {
            ticker: ticker.to_string(),
            timeframe: timeframe.to_string(),
            reason: "every row had missing fields",
        });
    }

    let candles = match normalize_timezone(&candles, reference_timezone) {
        Ok(converted) => converted,
        Err(e) => {
            warn!(
                ticker = %ticker,
                error = %e,
                "Fetcher: timezone conversion failed for {}, using bars as delivered",
                ticker
            );
            candles
        }
    };

    info!(
        ticker = %ticker,
        rows = candles.len(),
        dropped = raw_rows - candles.len(),
        "Fetcher: {} bars ready for {}",
        candles.len(),
        ticker
    );

    Ok(candles)
}
