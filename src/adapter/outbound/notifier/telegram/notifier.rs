//! Telegram notification delivery.
//!
//! Provides the [`TelegramNotifier`] for sending reports and lifecycle
//! alerts to a chat, optionally inside a forum topic.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ThreadId};
use tracing::{debug, error, info};

use crate::error::ConfigError;
use crate::port::{outbound::notifier::Event, outbound::notifier::Notifier};

use super::format::{format_event_message, split_message, MAX_MESSAGE_CHARS};

/// Configuration for the Telegram notifier.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
    /// Forum topic to post into, if the chat uses topics.
    pub topic_id: Option<i32>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("topic_id", &self.topic_id)
            .finish()
    }
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, and optionally
    /// `TOPIC_ID`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the token or chat id is
    /// absent and [`ConfigError::InvalidValue`] when an id does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = non_empty_var("TELEGRAM_BOT_TOKEN")
            .ok_or(ConfigError::MissingField { field: "TELEGRAM_BOT_TOKEN" })?;
        let chat_id = non_empty_var("TELEGRAM_CHAT_ID")
            .ok_or(ConfigError::MissingField { field: "TELEGRAM_CHAT_ID" })?
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "TELEGRAM_CHAT_ID",
                reason: "must be an integer chat id".into(),
            })?;
        let topic_id = non_empty_var("TOPIC_ID")
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "TOPIC_ID",
                    reason: "must be an integer topic id".into(),
                })
            })
            .transpose()?;

        Ok(Self {
            bot_token,
            chat_id,
            topic_id,
        })
    }

    /// Bot token with everything but the last four characters hidden.
    #[must_use]
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.bot_token.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Telegram notifier that sends messages to a chat.
pub struct TelegramNotifier {
    bot: Bot,
    config: TelegramConfig,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let bot = Bot::new(&config.bot_token);
        info!(
            chat_id = config.chat_id,
            topic_id = ?config.topic_id,
            "Telegram notifier ready"
        );
        Self { bot, config }
    }

    /// Send HTML text, split into as many messages as needed.
    ///
    /// # Errors
    ///
    /// Returns the first Bot API error; later chunks are not sent.
    pub async fn send_html(&self, text: &str) -> Result<usize, teloxide::RequestError> {
        let chat_id = ChatId(self.config.chat_id);
        let chunks = split_message(text, MAX_MESSAGE_CHARS);
        for chunk in &chunks {
            let mut request = self
                .bot
                .send_message(chat_id, chunk.as_str())
                .parse_mode(ParseMode::Html);
            if let Some(topic) = self.config.topic_id {
                request = request.message_thread_id(ThreadId(MessageId(topic)));
            }
            request.await?;
        }
        debug!(parts = chunks.len(), "Telegram message sent");
        Ok(chunks.len())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, event: &Event) {
        let Some(text) = format_event_message(event) else {
            return;
        };
        match self.send_html(&text).await {
            Ok(parts) => info!(parts, "Telegram message sent successfully"),
            Err(e) => error!(error = %e, "Failed to send Telegram message"),
        }
    }
}
