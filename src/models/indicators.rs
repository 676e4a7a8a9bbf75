use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Time index of a bar.
#[derive(Debug, Clone, PartialEq)]
pub enum BarTimestamp {
    /// Timezone-aware instant
    Zoned(DateTime<Tz>),
    /// Wall-clock time without timezone information
    Naive(NaiveDateTime),
    /// The source supplied something that is not a representable instant
    Invalid,
}

impl BarTimestamp {
    pub fn utc(&self) -> Option<DateTime<Utc>> {
        match self {
            BarTimestamp::Zoned(dt) => Some(dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Ordering key; naive times are read as UTC and invalid ones sort first.
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        match self {
            BarTimestamp::Zoned(dt) => Some(dt.naive_utc()),
            BarTimestamp::Naive(naive) => Some(*naive),
            BarTimestamp::Invalid => None,
        }
    }

    /// Whether both timestamps denote the same bar. Invalid timestamps never match.
    pub fn same_bar(&self, other: &BarTimestamp) -> bool {
        match (self, other) {
            (BarTimestamp::Zoned(a), BarTimestamp::Zoned(b)) => a == b,
            (BarTimestamp::Naive(a), BarTimestamp::Naive(b)) => a == b,
            _ => false,
        }
    }
}

impl From<DateTime<Utc>> for BarTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        BarTimestamp::Zoned(dt.with_timezone(&Tz::UTC))
    }
}

impl From<DateTime<Tz>> for BarTimestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        BarTimestamp::Zoned(dt)
    }
}

impl From<NaiveDateTime> for BarTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        BarTimestamp::Naive(dt)
    }
}

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: BarTimestamp,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: impl Into<BarTimestamp>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp: timestamp.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Names of the classifier features, in `IndicatorRow::features` order.
pub const FEATURE_NAMES: [&str; 7] = [
    "ema_fast", "ema_slow", "macd", "rsi", "bb_high", "bb_mid", "bb_low",
];

/// A candle augmented with the indicator values of its bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub candle: Candle,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub rsi: f64,
    pub bb_high: f64,
    pub bb_mid: f64,
    pub bb_low: f64,
}

impl IndicatorRow {
    pub fn close(&self) -> f64 {
        self.candle.close
    }

    pub fn features(&self) -> [f64; 7] {
        [
            self.ema_fast,
            self.ema_slow,
            self.macd,
            self.rsi,
            self.bb_high,
            self.bb_mid,
            self.bb_low,
        ]
    }

    /// Names of features that are NaN or infinite.
    pub fn undefined_features(&self) -> Vec<&'static str> {
        FEATURE_NAMES
            .iter()
            .zip(self.features())
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect()
    }
}
