//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases:
//!
//! - [`aggregator`]: run every exchange client once and collect results
//! - [`reporter`]: render console text, notification text, and snapshots
//! - [`cycle`]: one end-to-end fetch, render, persist, notify pass
//! - [`scheduler`]: the daily timed-wait loop around cycles
//! - [`stats`]: analysis of stored snapshots

pub mod aggregator;
pub mod cycle;
pub mod reporter;
pub mod scheduler;
pub mod stats;

pub use aggregator::Aggregator;
pub use cycle::{CycleOutcome, ReportCycle};
pub use reporter::{Rendered, Reporter, ReporterConfig};
pub use scheduler::{DailyTrigger, IntervalTrigger, RunSummary, Scheduler, SchedulerState, Trigger};
