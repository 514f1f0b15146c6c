//! Handler for the `run` command.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::application::CycleOutcome;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::{self, CycleOptions};
use crate::infrastructure::config::Config;

/// Execute the run command.
///
/// Fails when every exchange failed, so cron and supervisors see a non-zero
/// exit. A partial failure still exits cleanly.
pub async fn execute(args: &RunArgs, config: &Config) -> Result<()> {
    let options = CycleOptions {
        notify: !args.no_notify,
        snapshot: !args.no_snapshot,
    };
    let notifier = Arc::new(bootstrap::build_notifier_registry(config, options.notify)?);
    let cycle = bootstrap::build_cycle(config, config.reporter_config()?, notifier, options)?;

    output::header(env!("CARGO_PKG_VERSION"));
    let pb = output::spinner("Fetching market data");
    let outcome = cycle.run().await;
    let failed = outcome.report.failure_count();
    let total = outcome.report.results().len();
    if outcome.report.all_failed() {
        output::spinner_fail(&pb, "Every exchange failed");
    } else {
        output::spinner_success(
            &pb,
            &format!("Fetched {} of {total} exchanges", total - failed),
        );
    }

    print_outcome(&outcome);

    if outcome.report.all_failed() {
        return Err(Error::Cycle(format!("all {total} exchanges failed")));
    }
    Ok(())
}

fn print_outcome(outcome: &CycleOutcome) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "report": outcome.report,
            "snapshot": outcome.snapshot_path.as_ref().map(|p| p.display().to_string()),
            "snapshot_error": outcome.snapshot_error,
        }));
        return;
    }

    output::block(&outcome.rendered.console);
    if let Some(path) = &outcome.snapshot_path {
        output::field("Snapshot", path.display());
    }
    if let Some(error) = &outcome.snapshot_error {
        output::warning(&format!("Snapshot not saved: {error}"));
    }
}
