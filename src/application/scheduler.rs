//! Daily scheduler loop.
//!
//! An explicit timed-wait loop: compute the delay until the next trigger,
//! sleep while racing the shutdown signal, run a cycle inline, repeat.
//!
//! # Overlap
//!
//! Cycles never overlap. The next delay is computed only after the current
//! cycle has finished, so a trigger time that passes while a cycle is still
//! running is skipped rather than queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use tokio::sync::watch;
use tracing::{info, warn};

use super::cycle::ReportCycle;
use crate::port::{CycleFailedEvent, Event, LifecycleEvent, NotifierRegistry};

/// Default daily trigger time (07:00 local).
#[must_use]
pub fn default_run_at() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default()
}

/// Source of trigger times.
pub trait Trigger: Send + Sync {
    /// Time to wait from now until the next trigger.
    fn next_delay(&self) -> Duration;

    /// Human-readable schedule, e.g. `daily at 07:00`.
    fn describe(&self) -> String;
}

/// Fires once per calendar day at a fixed local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
}

impl DailyTrigger {
    #[must_use]
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    #[must_use]
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// First trigger instant strictly after `now`.
    ///
    /// When the wall-clock time does not exist on a day (DST gap) that day
    /// is skipped; when it exists twice the earlier instant is used.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        (0..=2)
            .filter_map(|offset| now.date_naive().checked_add_days(Days::new(offset)))
            .filter_map(|date| tz.from_local_datetime(&date.and_time(self.at)).earliest())
            .find(|candidate| candidate > now)
            .unwrap_or_else(|| now.clone() + chrono::Duration::days(1))
    }
}

impl Default for DailyTrigger {
    fn default() -> Self {
        Self::new(default_run_at())
    }
}

impl Trigger for DailyTrigger {
    fn next_delay(&self) -> Duration {
        let now = Local::now();
        (self.next_after(&now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn describe(&self) -> String {
        format!("daily at {}", self.at.format("%H:%M"))
    }
}

/// Fires at a fixed interval. Useful for soak runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTrigger {
    every: Duration,
}

impl IntervalTrigger {
    #[must_use]
    pub fn new(every: Duration) -> Self {
        Self { every }
    }
}

impl Trigger for IntervalTrigger {
    fn next_delay(&self) -> Duration {
        self.every
    }

    fn describe(&self) -> String {
        format!("every {}s", self.every.as_secs())
    }
}

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Counters for one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u32,
    pub failed: u32,
}

/// Drives report cycles on a trigger until shutdown.
pub struct Scheduler {
    cycle: ReportCycle,
    trigger: Box<dyn Trigger>,
    notifier: Arc<NotifierRegistry>,
    run_on_start: bool,
    state: watch::Sender<SchedulerState>,
}

impl Scheduler {
    pub fn new(
        cycle: ReportCycle,
        trigger: Box<dyn Trigger>,
        notifier: Arc<NotifierRegistry>,
        run_on_start: bool,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Stopped);
        Self {
            cycle,
            trigger,
            notifier,
            run_on_start,
            state,
        }
    }

    /// Observe state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Run until `shutdown` resolves.
    ///
    /// A shutdown that arrives while a cycle is running takes effect once the
    /// cycle finishes. Cycle failures are reported and never end the loop.
    pub async fn run<F>(&self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let schedule = self.trigger.describe();
        let mut summary = RunSummary::default();

        self.state.send_replace(SchedulerState::Running);
        info!(schedule = %schedule, run_on_start = self.run_on_start, "Scheduler running");
        self.notifier
            .notify_all(&Event::SchedulerStarted(LifecycleEvent {
                at: Local::now(),
                schedule: schedule.clone(),
            }))
            .await;

        if self.run_on_start {
            self.execute(&mut summary).await;
        }

        loop {
            let delay = self.trigger.next_delay();
            info!(wait_secs = delay.as_secs(), "Waiting for next trigger");

            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                () = tokio::time::sleep(delay) => {
                    self.execute(&mut summary).await;
                }
            }
        }

        self.notifier
            .notify_all(&Event::SchedulerStopped(LifecycleEvent {
                at: Local::now(),
                schedule,
            }))
            .await;
        self.state.send_replace(SchedulerState::Stopped);
        info!(
            cycles = summary.cycles,
            failed = summary.failed,
            "Scheduler stopped"
        );
        summary
    }

    async fn execute(&self, summary: &mut RunSummary) {
        summary.cycles += 1;
        let outcome = self.cycle.run().await;
        if let Some(reason) = outcome.failure() {
            summary.failed += 1;
            warn!(cycle = summary.cycles, reason = %reason, "Cycle failed");
            self.notifier
                .notify_all(&Event::CycleFailed(CycleFailedEvent {
                    at: Local::now(),
                    error: reason,
                }))
                .await;
        }
    }
}
