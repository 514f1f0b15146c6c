//! Telegram notification delivery.
//!
//! Sends rendered reports and scheduler alerts to a Telegram chat using
//! HTML parse mode.

mod format;

pub mod notifier;

pub use format::{format_event_message, split_message, MAX_MESSAGE_CHARS};
pub use notifier::{TelegramConfig, TelegramNotifier};
