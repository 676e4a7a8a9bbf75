//! Yahoo Finance chart API client.

use crate::models::indicators::BarTimestamp;
use crate::services::market_data::{MarketDataProvider, QueryPlan, RawBar, SourceError};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn epoch_timestamp(seconds: i64) -> BarTimestamp {
    match DateTime::from_timestamp(seconds, 0) {
        Some(dt) => dt.into(),
        None => BarTimestamp::Invalid,
    }
}

/// Parse a chart API response body into raw bars.
pub fn parse_chart(body: &str) -> Result<Vec<RawBar>, SourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;
    if let Some(err) = envelope.chart.error {
        return Err(SourceError::Api {
            code: err.code,
            description: err.description,
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    Ok(result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &seconds)| RawBar {
            timestamp: epoch_timestamp(seconds),
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: at(&quote.volume, i),
        })
        .collect())
}

pub struct YahooFinanceProvider {
    client: Client,
    base_url: Url,
}

impl YahooFinanceProvider {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { client, base_url })
    }

    fn chart_url(&self, ticker: &str, plan: &QueryPlan) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        url.query_pairs_mut()
            .append_pair("range", &plan.range.to_string())
            .append_pair("interval", &plan.interval)
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn download(&self, ticker: &str, plan: &QueryPlan) -> Result<Vec<RawBar>, SourceError> {
        let url = self.chart_url(ticker, plan)?;
        debug!(ticker = %ticker, url = %url, "Fetcher: GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The chart API reports unknown tickers and bad ranges in the body.
            if let Ok(envelope) = serde_json::from_str::<ChartEnvelope>(&body) {
                if let Some(err) = envelope.chart.error {
                    return Err(SourceError::Api {
                        code: err.code,
                        description: err.description,
                    });
                }
            }
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        parse_chart(&body)
    }
}
