pub mod format;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{NotifierError, Result};

/// Destination-agnostic send capability, so the poll controller can be
/// exercised in tests without a live bot.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends MarkdownV2 messages to one fixed chat via the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                NotifierError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: format!("https://api.telegram.org/bot{}/sendMessage", config.bot_token),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Telegram request to chat {} failed: {}", self.chat_id, e);
                NotifierError::NetworkError(format!("Failed to reach Telegram: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Telegram rejected message for chat {}: {} {}",
                self.chat_id, status, body
            );
            return Err(NotifierError::TelegramError(format!(
                "sendMessage failed with status {}: {}",
                status, body
            ))
            .into());
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            NotifierError::TelegramError(format!("Unreadable sendMessage response: {}", e))
        })?;
        if !api_response.ok {
            let description = api_response
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            warn!(
                "Telegram API error for chat {}: {}",
                self.chat_id, description
            );
            return Err(NotifierError::TelegramError(description).into());
        }

        debug!("Message delivered to chat {}", self.chat_id);
        Ok(())
    }
}
