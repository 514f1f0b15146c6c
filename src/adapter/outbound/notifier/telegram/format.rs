//! Message formatting for Telegram notifications.
//!
//! Converts domain events into Telegram HTML and splits long messages to
//! fit the Bot API limit.

use crate::application::reporter::format::escape_html;
use crate::port::outbound::notifier::Event;

/// Telegram's maximum message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an event as a Telegram HTML message.
///
/// Returns `None` for events that should not be sent.
pub fn format_event_message(event: &Event) -> Option<String> {
    match event {
        Event::SchedulerStarted(e) => Some(format!(
            "🚀 <b>Crypto Daily Report Scheduler Started</b>\n\n\
             ⏰ Scheduled to run {}\n\
             📅 Started on: {}\n\
             ✅ Scheduler is running and monitoring...",
            escape_html(&e.schedule),
            e.at.format(TIME_FORMAT)
        )),
        Event::SchedulerStopped(e) => Some(format!(
            "🛑 <b>Crypto Daily Report Scheduler Stopped</b>\n\n\
             📅 Stopped on: {}\n\
             ⚠️ Daily reports will no longer be sent automatically",
            e.at.format(TIME_FORMAT)
        )),
        Event::Report(e) if e.text.trim().is_empty() => None,
        Event::Report(e) => Some(e.text.clone()),
        Event::CycleFailed(e) => Some(format!(
            "❌ <b>Daily Crypto Report Error</b>\n\n{}\n📅 {}",
            escape_html(&e.error),
            e.at.format(TIME_FORMAT)
        )),
        Event::Test => Some(
            "🧪 <b>Telegram Integration Test</b>\n\n\
             ✅ moverwatch can deliver messages to this chat."
                .to_string(),
        ),
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Splits on line boundaries where possible so HTML tags, which never span
/// lines in rendered reports, stay balanced. A single line longer than the
/// limit is cut at character boundaries.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                let piece: String = piece.iter().collect();
                if piece.chars().count() == max_chars {
                    chunks.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current = piece;
                }
            }
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
        .into_iter()
        .map(|c| c.trim_end_matches('\n').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
