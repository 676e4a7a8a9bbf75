//! Turns a prediction into a tradeable signal and its chat message.

use crate::common::math::round_to;
use crate::models::indicators::{BarTimestamp, IndicatorRow};
use crate::models::signal::{Signal, SignalDirection};
use tracing::warn;

pub const PRICE_DECIMALS: u32 = 5;
pub const MESSAGE_BASIS: &str = "Basis: EMA + MACD + RSI + BB + AI";

/// Render a bar time as `DD/MM/YYYY HH:MM UTC`.
///
/// Naive timestamps cannot be converted and keep their wall-clock time with a
/// `Local` suffix; invalid ones become `N/A`.
pub fn render_timestamp(timestamp: &BarTimestamp) -> String {
    match timestamp {
        BarTimestamp::Zoned(_) => match timestamp.utc() {
            Some(utc) => utc.format("%d/%m/%Y %H:%M UTC").to_string(),
            None => "N/A".to_string(),
        },
        BarTimestamp::Naive(local) => {
            warn!("Formatter: bar timestamp has no timezone, rendering local time");
            local.format("%d/%m/%Y %H:%M Local").to_string()
        }
        BarTimestamp::Invalid => {
            warn!("Formatter: bar timestamp is not a valid instant");
            "N/A".to_string()
        }
    }
}

/// Entry, stop and target for a direction, unrounded.
pub fn price_levels(direction: SignalDirection, entry: f64, stop_fraction: f64, take_fraction: f64) -> (f64, f64) {
    match direction {
        SignalDirection::Buy => (entry * (1.0 - stop_fraction), entry * (1.0 + take_fraction)),
        SignalDirection::Sell => (entry * (1.0 + stop_fraction), entry * (1.0 - take_fraction)),
    }
}

pub fn format_signal(
    direction: SignalDirection,
    row: &IndicatorRow,
    market: &str,
    ticker: &str,
    stop_fraction: f64,
    take_fraction: f64,
) -> Signal {
    let entry = row.close();
    let (stop, target) = price_levels(direction, entry, stop_fraction, take_fraction);
    let timestamp = render_timestamp(&row.candle.timestamp);

    let message = format!(
        "🔔 Signal generated ({market})\n\n\
         Asset: {ticker}\n\
         Signal: {label}\n\
         Entry: {entry:.5}\n\
         Stop: {stop:.5}\n\
         Take: {target:.5}\n\
         Time: {timestamp}\n\
         {MESSAGE_BASIS}",
        label = direction.label(),
    );

    Signal {
        market: market.to_string(),
        ticker: ticker.to_string(),
        direction,
        entry: round_to(entry, PRICE_DECIMALS),
        stop: round_to(stop, PRICE_DECIMALS),
        target: round_to(target, PRICE_DECIMALS),
        timestamp,
        message,
    }
}
