//! Telegram notification configuration.
//!
//! Credentials never live in the config file; they are read from
//! `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, and `TOPIC_ID`.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Telegram notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Send reports and alerts to Telegram. Requires credentials.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
