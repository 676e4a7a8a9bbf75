//! Signal delivery.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const SEND_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_LOGGED_BODY: usize = 500;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

#[async_trait::async_trait]
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Telegram Bot API `sendMessage` notifier.
pub struct TelegramNotifier {
    client: Client,
    endpoint: Url,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: impl AsRef<str>,
        token: &str,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(api_base, token, chat_id, client)
    }

    pub fn with_client(
        api_base: impl AsRef<str>,
        token: &str,
        chat_id: impl Into<String>,
        client: Client,
    ) -> Result<Self, DeliveryError> {
        // The error must not echo the token, so only the base is reported.
        let invalid = || DeliveryError::InvalidUrl(api_base.as_ref().to_string());
        let mut endpoint = Url::parse(api_base.as_ref()).map_err(|_| invalid())?;
        endpoint
            .path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend([format!("bot{}", token).as_str(), "sendMessage"]);

        Ok(Self {
            client,
            endpoint,
            chat_id: chat_id.into(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Notifier: message delivered");
            return Ok(());
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_LOGGED_BODY)
            .collect();
        error!(
            status = status.as_u16(),
            body = %body,
            "Notifier: Telegram answered {}",
            status
        );
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Writes messages to stdout instead of delivering them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        println!("{}\n", text);
        Ok(())
    }
}
