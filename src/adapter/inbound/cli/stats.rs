//! Handler for the `stats` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::snapshot::JsonSnapshotStore;
use crate::application::reporter::format;
use crate::application::stats::{analyze, Mover, SnapshotStats};
use crate::error::Result;
use crate::port::SnapshotStore;

const LEADERBOARD_WIDTHS: [usize; 4] = [4, 10, 10, 10];

/// Execute `stats` against the newest snapshot in `dir`.
pub fn execute(dir: &Path) -> Result<()> {
    let store = JsonSnapshotStore::new(dir);
    let Some((path, snapshot)) = store.latest()? else {
        if output::is_json() {
            output::json_output(json!({
                "command": "stats",
                "dir": dir.display().to_string(),
                "snapshot": null,
            }));
        } else {
            output::warning(&format!("No snapshot files found in {}", dir.display()));
            output::hint("run `moverwatch run` to create one");
        }
        return Ok(());
    };

    let stats = analyze(&snapshot.report);

    if output::is_json() {
        output::json_output(json!({
            "command": "stats",
            "snapshot": path.display().to_string(),
            "taken_at": snapshot.taken_at,
            "stats": stats,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section("Snapshot");
    output::field("File", path.display());
    output::field(
        "Generated",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    print_exchanges(&stats);
    print_leaderboards(&stats);

    output::section("Summary");
    output::field("Total gainers", stats.total_gainers);
    output::field("Total losers", stats.total_losers);
    output::field("Total tokens", stats.total_tokens());
    output::field("Coverage", stats.coverage);

    Ok(())
}

fn print_exchanges(stats: &SnapshotStats) {
    for exchange in &stats.exchanges {
        output::section(exchange.exchange.display_name());
        if !exchange.success {
            output::warning(&format!(
                "Failed: {}",
                exchange.error.as_deref().unwrap_or("unknown error")
            ));
            continue;
        }
        output::field("Fetched", exchange.timestamp.format("%H:%M:%S UTC"));
        output::field("Gainers", exchange.gainers);
        output::field("Losers", exchange.losers);
        if let Some(best) = &exchange.best_gainer {
            output::field(
                "Best gainer",
                format!(
                    "{} {}",
                    best.symbol,
                    output::positive(format::percent(best.change_percent))
                ),
            );
        }
        if let Some(worst) = &exchange.worst_loser {
            output::field(
                "Worst loser",
                format!(
                    "{} {}",
                    worst.symbol,
                    output::negative(format::percent(worst.change_percent))
                ),
            );
        }
    }
}

fn print_leaderboards(stats: &SnapshotStats) {
    if !stats.top_gainers.is_empty() {
        output::section("Top Gainers (all exchanges)");
        print_movers(&stats.top_gainers, |s| output::positive(s));
    }
    if !stats.top_losers.is_empty() {
        output::section("Top Losers (all exchanges)");
        print_movers(&stats.top_losers, |s| output::negative(s));
    }
}

fn print_movers(movers: &[Mover], paint: fn(String) -> String) {
    output::table_header(&[
        ("#", LEADERBOARD_WIDTHS[0]),
        ("Symbol", LEADERBOARD_WIDTHS[1]),
        ("Exchange", LEADERBOARD_WIDTHS[2]),
        ("Change", LEADERBOARD_WIDTHS[3]),
    ]);
    for (i, mover) in movers.iter().enumerate() {
        output::table_row(
            &[
                format!("{}.", i + 1),
                mover.symbol.clone(),
                mover.exchange.display_name().to_string(),
                paint(format::percent(mover.change_percent)),
            ],
            &LEADERBOARD_WIDTHS,
        );
    }
}
