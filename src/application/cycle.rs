//! One report cycle: aggregate, render, persist, notify.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::aggregator::Aggregator;
use super::reporter::{Rendered, Reporter};
use crate::domain::AggregateReport;
use crate::port::{Event, NotifierRegistry, ReportEvent, SnapshotStore};

/// Result of a finished cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub report: AggregateReport,
    pub rendered: Rendered,
    /// Where the snapshot was written, when a store is configured.
    pub snapshot_path: Option<PathBuf>,
    /// Why the snapshot could not be written.
    pub snapshot_error: Option<String>,
}

impl CycleOutcome {
    /// Reason the cycle counts as failed, if it does.
    ///
    /// A cycle fails when every exchange failed or the snapshot could not be
    /// stored. Partial exchange failures are reported inline and do not
    /// fail the cycle.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        if self.report.all_failed() {
            return Some(format!(
                "all {} exchanges failed",
                self.report.results().len()
            ));
        }
        self.snapshot_error
            .as_ref()
            .map(|e| format!("snapshot not saved: {e}"))
    }
}

/// Runs one end-to-end report cycle.
pub struct ReportCycle {
    aggregator: Aggregator,
    reporter: Reporter,
    store: Option<Arc<dyn SnapshotStore>>,
    notifier: Arc<NotifierRegistry>,
}

impl ReportCycle {
    pub fn new(aggregator: Aggregator, reporter: Reporter, notifier: Arc<NotifierRegistry>) -> Self {
        Self {
            aggregator,
            reporter,
            store: None,
            notifier,
        }
    }

    /// Persist a snapshot of every report to `store`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Run the cycle to completion.
    ///
    /// Never fails outright; check [`CycleOutcome::failure`] for a degraded
    /// cycle. The rendered report is always sent to the notifiers, including
    /// when every exchange failed.
    pub async fn run(&self) -> CycleOutcome {
        let report = self.aggregator.run().await;
        let rendered = self.reporter.render(&report);

        let (snapshot_path, snapshot_error) = match &self.store {
            Some(store) => match store.save(&rendered.snapshot) {
                Ok(path) => {
                    info!(path = %path.display(), "Snapshot saved");
                    (Some(path), None)
                }
                Err(e) => {
                    error!(error = %e, "Failed to save snapshot");
                    (None, Some(e.to_string()))
                }
            },
            None => (None, None),
        };

        self.notifier
            .notify_all(&Event::Report(ReportEvent {
                text: rendered.message.clone(),
                summary: rendered.console.clone(),
                exchanges: report.results().len(),
                failures: report.failure_count(),
            }))
            .await;

        let outcome = CycleOutcome {
            report,
            rendered,
            snapshot_path,
            snapshot_error,
        };
        match outcome.failure() {
            Some(reason) => warn!(reason = %reason, "Report cycle degraded"),
            None => info!("Report cycle complete"),
        }
        outcome
    }
}
