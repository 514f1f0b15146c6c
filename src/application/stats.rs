//! Statistics over a stored snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::reporter::format::coverage_grade;
use crate::domain::{AggregateReport, AssetObservation, ExchangeId};

/// Cross-exchange leaderboard size.
pub const LEADERBOARD_SIZE: usize = 10;

/// One ranked asset in a stats view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mover {
    pub symbol: String,
    pub exchange: ExchangeId,
    pub change_percent: Decimal,
}

impl From<&AssetObservation> for Mover {
    fn from(asset: &AssetObservation) -> Self {
        Self {
            symbol: asset.symbol().to_string(),
            exchange: asset.exchange(),
            change_percent: asset.change_percent(),
        }
    }
}

/// Per-exchange figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeStats {
    pub exchange: ExchangeId,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub gainers: usize,
    pub losers: usize,
    pub best_gainer: Option<Mover>,
    pub worst_loser: Option<Mover>,
}

/// Summary of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotStats {
    pub generated_at: DateTime<Utc>,
    pub exchanges: Vec<ExchangeStats>,
    pub total_gainers: usize,
    pub total_losers: usize,
    pub coverage: &'static str,
    /// Strongest gainers across all exchanges.
    pub top_gainers: Vec<Mover>,
    /// Weakest losers across all exchanges.
    pub top_losers: Vec<Mover>,
}

impl SnapshotStats {
    #[must_use]
    pub fn total_tokens(&self) -> usize {
        self.total_gainers + self.total_losers
    }
}

/// Compute statistics for a report.
#[must_use]
pub fn analyze(report: &AggregateReport) -> SnapshotStats {
    let exchanges = report
        .results()
        .iter()
        .map(|r| ExchangeStats {
            exchange: r.exchange(),
            success: r.is_success(),
            error: r.error().map(str::to_string),
            timestamp: r.timestamp(),
            gainers: r.gainers().len(),
            losers: r.losers().len(),
            best_gainer: r.gainers().first().map(Mover::from),
            worst_loser: r.losers().first().map(Mover::from),
        })
        .collect();

    let mut top_gainers: Vec<Mover> = report
        .results()
        .iter()
        .flat_map(|r| r.gainers())
        .map(Mover::from)
        .collect();
    top_gainers.sort_by(|a, b| b.change_percent.cmp(&a.change_percent));
    top_gainers.truncate(LEADERBOARD_SIZE);

    let mut top_losers: Vec<Mover> = report
        .results()
        .iter()
        .flat_map(|r| r.losers())
        .map(Mover::from)
        .collect();
    top_losers.sort_by(|a, b| a.change_percent.cmp(&b.change_percent));
    top_losers.truncate(LEADERBOARD_SIZE);

    let total_gainers = report.total_gainers();
    let total_losers = report.total_losers();

    SnapshotStats {
        generated_at: report.generated_at(),
        exchanges,
        total_gainers,
        total_losers,
        coverage: coverage_grade(total_gainers + total_losers),
        top_gainers,
        top_losers,
    }
}
