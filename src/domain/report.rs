//! Aggregate report for one polling cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exchange::ExchangeId;
use super::result::ExchangeResult;

/// All exchange results gathered in one cycle, in configured exchange order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    generated_at: DateTime<Utc>,
    results: Vec<ExchangeResult>,
}

impl AggregateReport {
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>, results: Vec<ExchangeResult>) -> Self {
        Self {
            generated_at,
            results,
        }
    }

    /// When the cycle that produced this report started.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn results(&self) -> &[ExchangeResult] {
        &self.results
    }

    /// Look up the result for one exchange.
    pub fn result(&self, exchange: ExchangeId) -> Option<&ExchangeResult> {
        self.results.iter().find(|r| r.exchange() == exchange)
    }

    /// Total gainers across successful exchanges.
    pub fn total_gainers(&self) -> usize {
        self.results.iter().map(|r| r.gainers().len()).sum()
    }

    /// Total losers across successful exchanges.
    pub fn total_losers(&self) -> usize {
        self.results.iter().map(|r| r.losers().len()).sum()
    }

    /// Number of exchanges whose fetch failed.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// True when there was at least one exchange and every one failed.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.failure_count() == self.results.len()
    }
}
