//! Exchange client doubles for pipeline and scheduler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use moverwatch::domain::{AssetObservation, ExchangeId};
use moverwatch::error::ExchangeError;
use moverwatch::port::ExchangeClient;

/// Observation with the given 24h percentage change and fixed price data.
pub fn observation(exchange: ExchangeId, symbol: &str, change_percent: Decimal) -> AssetObservation {
    AssetObservation::builder(exchange, Utc::now())
        .symbol(symbol)
        .name(format!("{symbol} Token"))
        .price(Some(dec!(1.5)))
        .change(Some(change_percent / dec!(100)))
        .change_percent(Some(change_percent))
        .volume(Some(dec!(250000)))
        .build()
        .expect("valid observation")
}

/// Client returning a fixed set of observations and counting calls.
pub struct StubClient {
    exchange: ExchangeId,
    observations: Vec<AssetObservation>,
    calls: Arc<AtomicUsize>,
}

impl StubClient {
    pub fn new(exchange: ExchangeId, changes: &[(&str, Decimal)]) -> Self {
        Self {
            exchange,
            observations: changes
                .iter()
                .map(|(symbol, pct)| observation(exchange, symbol, *pct))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Two gainers and one loser.
    pub fn typical(exchange: ExchangeId) -> Self {
        Self::new(
            exchange,
            &[("BTC", dec!(5.25)), ("ETH", dec!(2.10)), ("XRP", dec!(-3.40))],
        )
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ExchangeClient for StubClient {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    fn rank_limit(&self) -> usize {
        50
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.observations.clone())
    }
}

/// Client whose exchange always answers with an HTTP error.
pub struct FailingClient {
    exchange: ExchangeId,
    status: u16,
}

impl FailingClient {
    pub fn new(exchange: ExchangeId) -> Self {
        Self {
            exchange,
            status: 503,
        }
    }
}

#[async_trait]
impl ExchangeClient for FailingClient {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    fn rank_limit(&self) -> usize {
        50
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        Err(ExchangeError::Status {
            status: self.status,
            body: "Service <Unavailable>".to_string(),
        })
    }
}

/// Client that takes `delay` (tokio time) before answering.
pub struct SlowClient {
    inner: StubClient,
    delay: std::time::Duration,
}

impl SlowClient {
    pub fn new(exchange: ExchangeId, delay: std::time::Duration) -> Self {
        Self {
            inner: StubClient::typical(exchange),
            delay,
        }
    }
}

#[async_trait]
impl ExchangeClient for SlowClient {
    fn exchange(&self) -> ExchangeId {
        self.inner.exchange()
    }

    fn rank_limit(&self) -> usize {
        self.inner.rank_limit()
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        tokio::time::sleep(self.delay).await;
        self.inner.observations().await
    }
}
