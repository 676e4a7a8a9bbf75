//! Worker configuration, read from the environment.

use crate::models::signal::RiskSettings;
use crate::services::{telegram, yahoo};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("cannot read markets file {path}: {source}")]
    MarketsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse markets file {path}: {source}")]
    MarketsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    pub name: String,
    pub tickers: Vec<String>,
}

const MARKET_ALIASES: [(&str, &str); 4] = [
    ("Câmbio (Forex)", "Forex"),
    ("Criptomoedas", "Crypto"),
    ("Ações", "Stocks"),
    ("Acoes", "Stocks"),
];

/// Tickers grouped by market name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketCatalog {
    markets: BTreeMap<String, Vec<String>>,
}

impl MarketCatalog {
    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 4] = [
            ("Forex", &["EURUSD=X", "GBPUSD=X", "USDJPY=X", "AUDUSD=X", "USDCAD=X"]),
            ("Crypto", &["BTC-USD", "ETH-USD", "SOL-USD", "BNB-USD"]),
            ("Stocks", &["AAPL", "MSFT", "AMZN", "PETR4.SA", "VALE3.SA"]),
            ("Commodities", &["GC=F", "CL=F", "SI=F"]),
        ];
        Self::from_markets(table.iter().map(|(name, tickers)| Market {
            name: name.to_string(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
        }))
    }

    pub fn from_markets(markets: impl IntoIterator<Item = Market>) -> Self {
        Self {
            markets: markets.into_iter().map(|m| (m.name, m.tickers)).collect(),
        }
    }

    /// Load a JSON object mapping market names to ticker lists.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let markets: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Ok(Self { markets })
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let json = std::fs::read_to_string(&path).map_err(|source| ConfigError::MarketsFile {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::MarketsFormat { path, source })
    }

    /// Tickers of `market`, empty when the market is unknown.
    pub fn assets(&self, market: &str) -> &[String] {
        self.markets.get(market).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, market: &str) -> bool {
        self.markets.contains_key(market)
    }

    /// Catalog name for `market`, accepting the Portuguese market names used by
    /// older deployments. Unknown names come back unchanged.
    pub fn resolve(&self, market: &str) -> String {
        if !self.contains(market) {
            if let Some((_, name)) = MARKET_ALIASES.iter().find(|(alias, _)| *alias == market) {
                if self.contains(name) {
                    return name.to_string();
                }
            }
        }
        market.to_string()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.markets.keys().map(String::as_str)
    }
}

impl Default for MarketCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    pub markets: Vec<String>,
    pub timeframe: String,
    pub risk: RiskSettings,
    pub analysis_interval: Duration,
    pub asset_throttle: Duration,
    pub market_throttle: Duration,
    pub log_path: PathBuf,
    pub reference_timezone: String,
    pub market_data_url: String,
    pub fetch_timeout: Duration,
    pub catalog: MarketCatalog,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let requested: Vec<String> = match get("MARKETS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![get("DEFAULT_MARKET").unwrap_or_else(|| "Forex".to_string())],
        };

        let timeframe = get("WORKER_TIMEFRAME")
            .or_else(|| get("DEFAULT_TIMEFRAME"))
            .unwrap_or_else(|| "15m".to_string());

        let stop_fraction = parse_or(&get, "DEFAULT_STOP_DEV", 0.003_f64)?;
        let take_fraction = parse_or(&get, "DEFAULT_TAKE_DEV", 0.003_f64)?;
        for (key, value) in [("DEFAULT_STOP_DEV", stop_fraction), ("DEFAULT_TAKE_DEV", take_fraction)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.to_string(),
                    reason: "must be a non-negative fraction".to_string(),
                });
            }
        }

        let interval_minutes: u64 = parse_or(&get, "ANALYSIS_INTERVAL_MINUTES", 10)?;
        if interval_minutes == 0 {
            return Err(ConfigError::Invalid {
                key: "ANALYSIS_INTERVAL_MINUTES",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let catalog = match get("MARKETS_FILE") {
            Some(path) => MarketCatalog::load(path)?,
            None => MarketCatalog::builtin(),
        };
        let markets = requested.iter().map(|m| catalog.resolve(m)).collect();

        Ok(Self {
            telegram_token: get("TELEGRAM_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| telegram::DEFAULT_API_URL.to_string()),
            markets,
            timeframe,
            risk: RiskSettings {
                stop_fraction,
                take_fraction,
            },
            analysis_interval: Duration::from_secs(interval_minutes * 60),
            asset_throttle: Duration::from_secs(parse_or(&get, "ASSET_THROTTLE_SECONDS", 3)?),
            market_throttle: Duration::from_secs(parse_or(&get, "MARKET_THROTTLE_SECONDS", 5)?),
            log_path: get("WORKER_LOG_PATH")
                .unwrap_or_else(|| "alpha_signals_worker.log".to_string())
                .into(),
            reference_timezone: get("REFERENCE_TIMEZONE")
                .unwrap_or_else(|| "America/Sao_Paulo".to_string()),
            market_data_url: get("MARKET_DATA_URL")
                .unwrap_or_else(|| yahoo::DEFAULT_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(parse_or(&get, "FETCH_TIMEOUT_SECONDS", 30)?),
            catalog,
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Telegram credentials, present only when both token and chat id are set.
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            token: self.telegram_token.clone()?,
            chat_id: self.telegram_chat_id.clone()?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
