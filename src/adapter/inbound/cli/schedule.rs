//! Handler for the `schedule` command.

use crate::adapter::inbound::cli::command::ScheduleArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, CycleOptions};
use crate::infrastructure::config::schedule::parse_time;
use crate::infrastructure::config::Config;
use crate::infrastructure::shutdown;

/// Execute the schedule command; returns after Ctrl-C or SIGTERM.
pub async fn execute(args: &ScheduleArgs, config: &Config) -> Result<()> {
    let stop = shutdown::listen();

    let run_at = match &args.at {
        Some(raw) => parse_time(raw)?,
        None => config.run_at()?,
    };
    let run_on_start = config.schedule.run_on_start && !args.skip_initial;
    let scheduler =
        bootstrap::build_scheduler(config, Some(run_at), run_on_start, CycleOptions::default())?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Schedule", format!("daily at {}", run_at.format("%H:%M")));
    output::field("Exchanges", config.exchanges.enabled().len());
    output::field("Run on start", run_on_start);
    output::hint("press Ctrl-C to stop");

    let summary = scheduler.run(shutdown::requested(stop)).await;

    output::section("Stopped");
    output::field("Cycles", summary.cycles);
    output::field("Failed", summary.failed);
    Ok(())
}
