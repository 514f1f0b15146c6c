//! Multi-exchange aggregation.
//!
//! Runs every registered [`ExchangeClient`] once per cycle and collects one
//! [`ExchangeResult`] per client. Clients run concurrently, each on its own
//! task, so a panicking adapter degrades only its own result. Results are
//! returned in registration order.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{error, info};

use crate::domain::{AggregateReport, ExchangeId, ExchangeResult};
use crate::error::{ConfigError, Result};
use crate::port::ExchangeClient;

/// Runs a fixed set of exchange clients.
#[derive(Default)]
pub struct Aggregator {
    clients: Vec<Arc<dyn ExchangeClient>>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client. Each exchange may be registered once.
    pub fn register(&mut self, client: Arc<dyn ExchangeClient>) -> Result<()> {
        let exchange = client.exchange();
        if self.clients.iter().any(|c| c.exchange() == exchange) {
            return Err(ConfigError::InvalidValue {
                field: "exchanges",
                reason: format!("{exchange} registered twice"),
            }
            .into());
        }
        self.clients.push(client);
        Ok(())
    }

    /// Exchanges in registration order.
    #[must_use]
    pub fn exchanges(&self) -> Vec<ExchangeId> {
        self.clients.iter().map(|c| c.exchange()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Fetch from every client and assemble the cycle report.
    ///
    /// Never fails: every registered exchange contributes exactly one result.
    pub async fn run(&self) -> AggregateReport {
        let generated_at = Utc::now();
        info!(exchanges = self.clients.len(), "Fetching exchange data");

        let handles = self.clients.iter().map(|client| {
            let client = Arc::clone(client);
            tokio::spawn(async move { client.fetch().await })
        });
        let joined = join_all(handles).await;

        let results: Vec<ExchangeResult> = joined
            .into_iter()
            .zip(&self.clients)
            .map(|(outcome, client)| match outcome {
                Ok(result) => result,
                Err(e) => {
                    error!(exchange = %client.exchange(), error = %e, "Exchange task aborted");
                    ExchangeResult::failure(
                        client.exchange(),
                        format!("fetch task aborted: {e}"),
                        Utc::now(),
                    )
                }
            })
            .collect();

        let report = AggregateReport::new(generated_at, results);
        info!(
            gainers = report.total_gainers(),
            losers = report.total_losers(),
            failures = report.failure_count(),
            "Aggregation complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetObservation;
    use crate::error::{Error, ExchangeError};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::time::Duration;

    struct StubClient {
        exchange: ExchangeId,
        percents: Option<Vec<i64>>,
        delay: Duration,
    }

    impl StubClient {
        fn ok(exchange: ExchangeId, percents: Vec<i64>) -> Arc<Self> {
            Arc::new(Self {
                exchange,
                percents: Some(percents),
                delay: Duration::ZERO,
            })
        }

        fn failing(exchange: ExchangeId) -> Arc<Self> {
            Arc::new(Self {
                exchange,
                percents: None,
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl ExchangeClient for StubClient {
        fn exchange(&self) -> ExchangeId {
            self.exchange
        }

        fn rank_limit(&self) -> usize {
            2
        }

        async fn observations(&self) -> std::result::Result<Vec<AssetObservation>, ExchangeError> {
            tokio::time::sleep(self.delay).await;
            let Some(percents) = &self.percents else {
                return Err(ExchangeError::Payload("stub failure".into()));
            };
            Ok(percents
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    AssetObservation::builder(self.exchange, Utc::now())
                        .symbol(format!("A{i}"))
                        .price(Some(Decimal::ONE))
                        .change(Some(Decimal::ZERO))
                        .change_percent(Some(Decimal::from(*p)))
                        .volume(Some(Decimal::ONE))
                        .build()
                        .unwrap()
                })
                .collect())
        }
    }

    struct PanickingClient;

    #[async_trait]
    impl ExchangeClient for PanickingClient {
        fn exchange(&self) -> ExchangeId {
            ExchangeId::Bybit
        }

        fn rank_limit(&self) -> usize {
            1
        }

        async fn observations(&self) -> std::result::Result<Vec<AssetObservation>, ExchangeError> {
            panic!("adapter bug");
        }
    }

    #[tokio::test]
    async fn one_result_per_exchange_in_registration_order() {
        let mut aggregator = Aggregator::new();
        aggregator
            .register(Arc::new(StubClient {
                exchange: ExchangeId::Bybit,
                percents: Some(vec![1]),
                delay: Duration::from_millis(30),
            }))
            .unwrap();
        aggregator
            .register(StubClient::failing(ExchangeId::CoinGecko))
            .unwrap();
        aggregator
            .register(StubClient::ok(ExchangeId::Binance, vec![5, -3, 12]))
            .unwrap();

        let report = aggregator.run().await;
        let order: Vec<_> = report.results().iter().map(|r| r.exchange()).collect();

        assert_eq!(
            order,
            vec![ExchangeId::Bybit, ExchangeId::CoinGecko, ExchangeId::Binance]
        );
        assert_eq!(report.failure_count(), 1);
    }

    #[tokio::test]
    async fn failure_does_not_block_other_exchanges() {
        let mut aggregator = Aggregator::new();
        aggregator
            .register(StubClient::failing(ExchangeId::CoinGecko))
            .unwrap();
        aggregator
            .register(StubClient::ok(ExchangeId::Binance, vec![5, -3, 12]))
            .unwrap();

        let report = aggregator.run().await;

        let failed = report.result(ExchangeId::CoinGecko).unwrap();
        assert!(!failed.is_success());
        assert!(failed.gainers().is_empty());
        assert!(failed.error().unwrap().contains("stub failure"));

        let ok = report.result(ExchangeId::Binance).unwrap();
        assert!(ok.is_success());
        let gainers: Vec<_> = ok.gainers().iter().map(|a| a.change_percent()).collect();
        assert_eq!(gainers, vec![Decimal::from(12), Decimal::from(5)]);
        assert_eq!(ok.losers().len(), 1);
    }

    #[tokio::test]
    async fn panicking_client_becomes_failure() {
        let mut aggregator = Aggregator::new();
        aggregator.register(Arc::new(PanickingClient)).unwrap();
        aggregator
            .register(StubClient::ok(ExchangeId::Binance, vec![1]))
            .unwrap();

        let report = aggregator.run().await;

        assert_eq!(report.results().len(), 2);
        let failed = report.result(ExchangeId::Bybit).unwrap();
        assert!(!failed.is_success());
        assert!(failed.error().unwrap().contains("aborted"));
        assert!(report.result(ExchangeId::Binance).unwrap().is_success());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut aggregator = Aggregator::new();
        aggregator
            .register(StubClient::ok(ExchangeId::Binance, vec![]))
            .unwrap();
        let err = aggregator
            .register(StubClient::ok(ExchangeId::Binance, vec![]))
            .unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(aggregator.len(), 1);
    }

    #[tokio::test]
    async fn empty_aggregator_yields_empty_report() {
        let report = Aggregator::new().run().await;
        assert!(report.results().is_empty());
        assert!(!report.all_failed());
    }
}
