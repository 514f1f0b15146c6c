//! Exchange adapters.
//!
//! One [`ExchangeClient`] per supported exchange, each with an explicit
//! mapping from the provider's JSON to [`AssetObservation`](crate::domain::AssetObservation).

pub mod binance;
pub mod bybit;
pub mod coingecko;
mod decimal;
pub mod http;
pub mod settings;

use std::sync::Arc;

pub use binance::BinanceClient;
pub use bybit::BybitClient;
pub use coingecko::CoinGeckoClient;
pub use settings::{BinanceSettings, BybitSettings, CoinGeckoSettings, ExchangesConfig, HttpSettings};

use crate::domain::ExchangeId;
use crate::error::ExchangeError;
use crate::port::ExchangeClient;

/// Build clients for every enabled exchange, in registration order.
///
/// All clients share one HTTP connection pool.
pub fn build_clients(
    exchanges: &ExchangesConfig,
    http: &HttpSettings,
    rank_limit: usize,
) -> Result<Vec<Arc<dyn ExchangeClient>>, ExchangeError> {
    let client = http::build_client(http)?;
    Ok(exchanges
        .enabled()
        .into_iter()
        .map(|id| -> Arc<dyn ExchangeClient> {
            match id {
                ExchangeId::CoinGecko => Arc::new(CoinGeckoClient::new(
                    client.clone(),
                    exchanges.coingecko.clone(),
                    rank_limit,
                )),
                ExchangeId::Binance => Arc::new(BinanceClient::new(
                    client.clone(),
                    exchanges.binance.clone(),
                    rank_limit,
                )),
                ExchangeId::Bybit => Arc::new(BybitClient::new(
                    client.clone(),
                    exchanges.bybit.clone(),
                    rank_limit,
                )),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_clients_follows_enabled_flags() {
        let mut exchanges = ExchangesConfig::default();
        exchanges.coingecko.enabled = false;

        let clients = build_clients(&exchanges, &HttpSettings::default(), 25).unwrap();
        let ids: Vec<_> = clients.iter().map(|c| c.exchange()).collect();

        assert_eq!(ids, vec![ExchangeId::Binance, ExchangeId::Bybit]);
        assert!(clients.iter().all(|c| c.rank_limit() == 25));
    }
}
