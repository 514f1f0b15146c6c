//! Handlers for the `check` command group.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;

/// Send a test message to the configured Telegram chat.
#[cfg(feature = "telegram")]
pub async fn execute_telegram() -> Result<()> {
    use crate::adapter::outbound::notifier::telegram::{
        format_event_message, TelegramConfig, TelegramNotifier,
    };
    use crate::error::Error;
    use crate::port::Event;

    let tg_config = TelegramConfig::from_env()?;
    let masked_token = tg_config.masked_token();
    let chat_id = tg_config.chat_id;
    let topic_id = tg_config.topic_id;

    output::section("Telegram Check");
    output::action("Sending", "Telegram test message");
    output::field("Bot token", &masked_token);
    output::field("Chat ID", chat_id);
    if let Some(topic) = topic_id {
        output::field("Topic ID", topic);
    }

    let text = format_event_message(&Event::Test).unwrap_or_default();
    TelegramNotifier::new(tg_config)
        .send_html(&text)
        .await
        .map_err(|e| Error::Notify(e.to_string()))?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.telegram",
            "masked_token": masked_token,
            "chat_id": chat_id,
            "topic_id": topic_id,
            "status": "sent",
        }));
        return Ok(());
    }

    output::action_done("Sent", "Telegram test message");
    output::hint("check Telegram for the message");
    Ok(())
}

/// Telegram support was compiled out.
#[cfg(not(feature = "telegram"))]
pub async fn execute_telegram() -> Result<()> {
    use crate::error::ConfigError;

    if output::is_json() {
        output::json_output(json!({
            "command": "check.telegram",
            "status": "unsupported",
        }));
    }
    Err(ConfigError::InvalidValue {
        field: "telegram",
        reason: "moverwatch was built without the telegram feature".to_string(),
    }
    .into())
}
