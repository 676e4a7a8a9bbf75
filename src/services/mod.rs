//! External collaborators: market data source and messaging

pub mod market_data;
pub mod telegram;
pub mod yahoo;

pub use market_data::{fetch_candles, MarketDataProvider, QueryPlan, RawBar, SourceError};
pub use telegram::{ConsoleNotifier, DeliveryError, Notifier, TelegramNotifier};
pub use yahoo::YahooFinanceProvider;
