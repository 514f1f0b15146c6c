//! Per-exchange outcome of one polling cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::AssetObservation;
use super::exchange::ExchangeId;
use super::ranking::Ranking;

/// Result of polling one exchange.
///
/// A failed fetch still produces a result: `success` is false, both lists
/// are empty and `error` describes what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResult {
    exchange: ExchangeId,
    gainers: Vec<AssetObservation>,
    losers: Vec<AssetObservation>,
    timestamp: DateTime<Utc>,
    success: bool,
    error: Option<String>,
}

impl ExchangeResult {
    /// A successful result from a computed ranking.
    #[must_use]
    pub fn success(exchange: ExchangeId, ranking: Ranking, timestamp: DateTime<Utc>) -> Self {
        Self {
            exchange,
            gainers: ranking.gainers,
            losers: ranking.losers,
            timestamp,
            success: true,
            error: None,
        }
    }

    /// A failed result carrying a description of the failure.
    ///
    /// An empty description is replaced so that failures are never silent.
    #[must_use]
    pub fn failure(
        exchange: ExchangeId,
        error: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };
        Self {
            exchange,
            gainers: Vec::new(),
            losers: Vec::new(),
            timestamp,
            success: false,
            error: Some(error),
        }
    }

    pub fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    /// Gainers, largest percentage change first.
    pub fn gainers(&self) -> &[AssetObservation] {
        &self.gainers
    }

    /// Losers, largest percentage drop first.
    pub fn losers(&self) -> &[AssetObservation] {
        &self.losers
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
