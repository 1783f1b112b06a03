use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{NotifierError, Result};

pub const MOSTAQL_URL: &str = "https://mostaql.com/projects?sort=latest";
pub const SENT_LINKS_FILE: &str = "sent_projects.txt";
pub const CHECK_INTERVAL_SECS: u64 = 60;
pub const SEND_PAUSE_SECS: u64 = 1;

/// Runtime configuration, built once at startup and passed into the
/// poll controller and notifier.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub listing_url: String,
    pub seen_links_file: PathBuf,
    pub check_interval: Duration,
    pub send_pause: Duration,
}

impl Config {
    /// Read credentials from the environment. Missing credentials are a
    /// fatal startup condition, reported before any network activity.
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| NotifierError::ConfigError("TELEGRAM_BOT_TOKEN is not set".to_string()))?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| NotifierError::ConfigError("TELEGRAM_CHAT_ID is not set".to_string()))?;

        let config = Self {
            bot_token,
            chat_id,
            listing_url: MOSTAQL_URL.to_string(),
            seen_links_file: PathBuf::from(SENT_LINKS_FILE),
            check_interval: Duration::from_secs(CHECK_INTERVAL_SECS),
            send_pause: Duration::from_secs(SEND_PAUSE_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.bot_token.trim().is_empty() {
            return Err(NotifierError::ConfigError("bot token cannot be empty".to_string()).into());
        }
        if self.chat_id.trim().is_empty() {
            return Err(NotifierError::ConfigError("chat id cannot be empty".to_string()).into());
        }
        if !self.listing_url.starts_with("http://") && !self.listing_url.starts_with("https://") {
            return Err(NotifierError::ConfigError(format!(
                "listing_url '{}' must start with http:// or https://",
                self.listing_url
            ))
            .into());
        }
        if self.check_interval.is_zero() {
            return Err(
                NotifierError::ConfigError("check_interval must be greater than 0".to_string())
                    .into(),
            );
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            bot_token: "123456:ABC-token".to_string(),
            chat_id: "-1001234567890".to_string(),
            listing_url: MOSTAQL_URL.to_string(),
            seen_links_file: PathBuf::from(SENT_LINKS_FILE),
            check_interval: Duration::from_secs(CHECK_INTERVAL_SECS),
            send_pause: Duration::from_secs(SEND_PAUSE_SECS),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut config = test_config();
        config.bot_token = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_chat_id_rejected() {
        let mut config = test_config();
        config.chat_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut config = test_config();
        config.listing_url = "mostaql.com/projects".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = test_config();
        config.check_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
