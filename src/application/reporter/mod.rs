//! Report rendering.
//!
//! Turns an [`AggregateReport`] into the three artifacts a cycle emits:
//! a console summary, a notification message, and a snapshot record.
//! Rendering is pure; the only time embedded in the output is the report's
//! own timestamp, so rendering the same report twice yields identical output.

mod console;
pub mod format;
mod message;

use chrono::NaiveTime;

pub use console::ConsoleSummary;
pub use message::HtmlMessage;

use crate::domain::AggregateReport;
use crate::port::Snapshot;

/// Default number of entries shown per list.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// Reporter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Top-K entries shown per gainer and loser list.
    pub display_limit: usize,
    /// Daily trigger time announced in the message footer.
    pub next_run: NaiveTime,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            display_limit: DEFAULT_DISPLAY_LIMIT,
            next_run: crate::application::scheduler::default_run_at(),
        }
    }
}

/// Everything rendered from one report.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Plain-text console summary.
    pub console: String,
    /// Telegram HTML message.
    pub message: String,
    /// Snapshot record for durable storage.
    pub snapshot: Snapshot,
}

/// Renders aggregate reports.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    config: ReporterConfig,
}

impl Reporter {
    #[must_use]
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Render the console summary.
    #[must_use]
    pub fn console(&self, report: &AggregateReport) -> String {
        ConsoleSummary::new(report, self.config.display_limit).to_string()
    }

    /// Render the notification message.
    #[must_use]
    pub fn message(&self, report: &AggregateReport) -> String {
        HtmlMessage::new(report, self.config.display_limit, self.config.next_run).to_string()
    }

    /// Render all artifacts for a report.
    #[must_use]
    pub fn render(&self, report: &AggregateReport) -> Rendered {
        Rendered {
            console: self.console(report),
            message: self.message(report),
            snapshot: Snapshot::new(report.clone()),
        }
    }
}
