//! Exchange port for market data retrieval.
//!
//! Each supported exchange implements [`ExchangeClient`]. Implementations
//! only need to fetch and normalize observations; ranking and the
//! never-fail contract of [`ExchangeClient::fetch`] live in the provided
//! method so every adapter behaves the same way.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::domain::{rank, AssetObservation, ExchangeId, ExchangeResult};
use crate::error::ExchangeError;

/// Source of 24h market statistics for one exchange.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Which exchange this client talks to.
    fn exchange(&self) -> ExchangeId;

    /// Maximum gainers and losers kept after ranking.
    fn rank_limit(&self) -> usize;

    /// Fetch and normalize every candidate asset.
    ///
    /// Records that cannot be mapped are skipped; an error is returned only
    /// when the exchange as a whole could not be read.
    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError>;

    /// Fetch, rank, and wrap the outcome in an [`ExchangeResult`].
    ///
    /// Never fails: transport, status, and payload errors become a result
    /// with `success = false` and a descriptive error.
    async fn fetch(&self) -> ExchangeResult {
        let exchange = self.exchange();
        match self.observations().await {
            Ok(observations) => {
                let candidates = observations.len();
                let ranking = rank(observations, self.rank_limit());
                info!(
                    exchange = %exchange,
                    candidates,
                    gainers = ranking.gainers.len(),
                    losers = ranking.losers.len(),
                    "Exchange data fetched"
                );
                ExchangeResult::success(exchange, ranking, Utc::now())
            }
            Err(e) => {
                error!(exchange = %exchange, error = %e, "Exchange fetch failed");
                ExchangeResult::failure(exchange, e.to_string(), Utc::now())
            }
        }
    }
}
