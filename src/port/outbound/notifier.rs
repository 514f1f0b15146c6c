//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about scheduler
//! lifecycle changes, finished reports, and degraded cycles.

use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// The scheduler started and is waiting for its first trigger.
    SchedulerStarted(LifecycleEvent),
    /// The scheduler received an interrupt and is exiting.
    SchedulerStopped(LifecycleEvent),
    /// A finished report, already rendered for the sink.
    Report(ReportEvent),
    /// A cycle failed or produced no usable data.
    CycleFailed(CycleFailedEvent),
    /// Connectivity check requested by an operator.
    Test,
}

/// Scheduler lifecycle event.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// When the transition happened.
    pub at: DateTime<Local>,
    /// When cycles run, e.g. `daily at 07:00`.
    pub schedule: String,
}

/// Rendered report event.
#[derive(Debug, Clone)]
pub struct ReportEvent {
    /// Message body in the sink's markup.
    pub text: String,
    /// Plain-text summary for local output.
    pub summary: String,
    /// Number of exchanges in the report.
    pub exchanges: usize,
    /// Number of exchanges that failed.
    pub failures: usize,
}

/// Degraded cycle event.
#[derive(Debug, Clone)]
pub struct CycleFailedEvent {
    /// When the failure was observed.
    pub at: DateTime<Local>,
    /// What went wrong.
    pub error: String,
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Delivery failures are logged by the implementation and never returned,
///   so a broken sink cannot stop a report cycle or the scheduler
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Handle an event.
    async fn notify(&self, event: &Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers, in registration order.
    pub async fn notify_all(&self, event: &Event) {
        for notifier in &self.notifiers {
            notifier.notify(event).await;
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _event: &Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &Event) {
        use tracing::{debug, info, warn};
        match event {
            Event::SchedulerStarted(e) => {
                info!(schedule = %e.schedule, at = %e.at, "Scheduler started");
            }
            Event::SchedulerStopped(e) => {
                info!(at = %e.at, "Scheduler stopped");
            }
            Event::Report(e) => {
                info!(
                    exchanges = e.exchanges,
                    failures = e.failures,
                    chars = e.text.chars().count(),
                    "Report ready"
                );
                debug!("\n{}", e.summary);
            }
            Event::CycleFailed(e) => {
                warn!(error = %e.error, at = %e.at, "Report cycle degraded");
            }
            Event::Test => {
                info!("Test notification");
            }
        }
    }
}
