//! CoinGecko `coins/markets` client.
//!
//! Scans the top coins by market cap, paging through `coins/markets` until
//! enough coins are collected or a short page signals the end.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::decimal::lenient;
use super::http::{decode_records, get_json};
use super::settings::CoinGeckoSettings;
use crate::domain::{AssetObservation, ExchangeId};
use crate::error::ExchangeError;
use crate::port::ExchangeClient;

/// Header carrying a CoinGecko pro API key.
const API_KEY_HEADER: &str = "x-cg-pro-api-key";

/// One entry of the `coins/markets` response.
#[derive(Debug, Deserialize)]
struct CoinMarket {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    current_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    price_change_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    price_change_percentage_24h: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    total_volume: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    market_cap: Option<Decimal>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
}

impl CoinMarket {
    fn into_observation(self, at: DateTime<Utc>) -> Option<AssetObservation> {
        AssetObservation::builder(ExchangeId::CoinGecko, at)
            .symbol(self.symbol)
            .name(self.name.unwrap_or_default())
            .price(self.current_price)
            .change(self.price_change_24h)
            .change_percent(self.price_change_percentage_24h)
            .volume(self.total_volume)
            .market_cap(self.market_cap, self.market_cap_rank)
            .build()
            .ok()
    }
}

/// Map raw `coins/markets` entries, skipping unusable ones.
pub fn map_markets(items: Vec<Value>, at: DateTime<Utc>) -> Vec<AssetObservation> {
    let total = items.len();
    let (markets, undecodable) = decode_records::<CoinMarket>(items);
    let observations: Vec<_> = markets
        .into_iter()
        .filter_map(|m| m.into_observation(at))
        .collect();
    if observations.len() < total {
        debug!(
            exchange = %ExchangeId::CoinGecko,
            total,
            undecodable,
            skipped = total - observations.len(),
            "Skipped incomplete market entries"
        );
    }
    observations
}

/// Number of pages needed to cover `top_coins` at `per_page` per page.
fn page_count(top_coins: usize, per_page: usize) -> usize {
    top_coins.div_ceil(per_page.max(1))
}

/// CoinGecko market-data client.
pub struct CoinGeckoClient {
    http: Client,
    settings: CoinGeckoSettings,
    rank_limit: usize,
}

impl CoinGeckoClient {
    pub fn new(http: Client, settings: CoinGeckoSettings, rank_limit: usize) -> Self {
        Self {
            http,
            settings,
            rank_limit,
        }
    }

    async fn page(&self, page: usize) -> Result<Vec<Value>, ExchangeError> {
        let url = format!("{}/coins/markets", self.settings.effective_base_url());
        let per_page = self.settings.per_page.to_string();
        let page = page.to_string();
        let mut request = self.http.get(&url).query(&[
            ("vs_currency", self.settings.vs_currency.as_str()),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
            ("sparkline", "false"),
            ("price_change_percentage", "24h"),
        ]);
        if let Some(key) = &self.settings.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        match get_json::<Value>(request).await? {
            Value::Array(items) => Ok(items),
            other => Err(unexpected_body(&other)),
        }
    }
}

/// Describe a non-array body, preferring CoinGecko's own error message.
fn unexpected_body(body: &Value) -> ExchangeError {
    let message = body
        .pointer("/status/error_message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str);
    match message {
        Some(message) => ExchangeError::Api {
            code: body
                .pointer("/status/error_code")
                .and_then(Value::as_i64)
                .unwrap_or(0),
            message: message.to_string(),
        },
        None => ExchangeError::Payload("expected a JSON array of markets".into()),
    }
}

#[async_trait]
impl ExchangeClient for CoinGeckoClient {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::CoinGecko
    }

    fn rank_limit(&self) -> usize {
        self.rank_limit
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        let top_coins = self.settings.top_coins;
        let per_page = self.settings.per_page.max(1);
        let mut raw: Vec<Value> = Vec::with_capacity(top_coins);

        for page in 1..=page_count(top_coins, per_page) {
            let items = self.page(page).await?;
            let returned = items.len();
            raw.extend(items);
            debug!(exchange = %ExchangeId::CoinGecko, page, returned, "Fetched market page");
            if raw.len() >= top_coins || returned < per_page {
                break;
            }
        }
        raw.truncate(top_coins);

        info!(
            exchange = %ExchangeId::CoinGecko,
            coins = raw.len(),
            "Fetched coins for analysis"
        );
        Ok(map_markets(raw, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::exchange::http::build_client;
    use crate::adapter::outbound::exchange::settings::HttpSettings;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fixture() -> Vec<Value> {
        vec![
            json!({
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": 64250.12,
                "market_cap": 1265000000000u64,
                "market_cap_rank": 1,
                "total_volume": 31000000000u64,
                "price_change_24h": 1250.5,
                "price_change_percentage_24h": 1.98
            }),
            json!({
                "symbol": "pepe",
                "name": "Pepe",
                "current_price": 0.00001234,
                "market_cap": null,
                "market_cap_rank": null,
                "total_volume": 800000000,
                "price_change_24h": -0.0000005,
                "price_change_percentage_24h": -3.9
            }),
            // No 24h change yet: skipped.
            json!({
                "symbol": "new",
                "name": "Fresh Listing",
                "current_price": 1.0,
                "total_volume": 10,
                "price_change_24h": null,
                "price_change_percentage_24h": null
            }),
            // Not an object: skipped.
            json!("garbage"),
        ]
    }

    #[test]
    fn maps_markets_and_skips_incomplete() {
        let at = Utc::now();
        let observations = map_markets(fixture(), at);

        assert_eq!(observations.len(), 2);
        let btc = &observations[0];
        assert_eq!(btc.symbol(), "BTC");
        assert_eq!(btc.name(), "Bitcoin");
        assert_eq!(btc.price(), dec!(64250.12));
        assert_eq!(btc.change_percent(), dec!(1.98));
        assert_eq!(btc.market_cap(), Some(dec!(1265000000000)));
        assert_eq!(btc.rank(), Some(1));
        assert_eq!(btc.exchange(), ExchangeId::CoinGecko);
        assert_eq!(btc.timestamp(), at);

        let pepe = &observations[1];
        assert_eq!(pepe.price(), dec!(0.00001234));
        assert_eq!(pepe.market_cap(), None);
        assert_eq!(pepe.rank(), None);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(1000, 250), 4);
        assert_eq!(page_count(1001, 250), 5);
        assert_eq!(page_count(100, 250), 1);
        assert_eq!(page_count(0, 250), 0);
    }

    #[test]
    fn error_body_becomes_api_error() {
        let body = json!({
            "status": { "error_code": 429, "error_message": "You've exceeded the Rate Limit" }
        });

        match unexpected_body(&body) {
            ExchangeError::Api { code, message } => {
                assert_eq!(code, 429);
                assert!(message.contains("Rate Limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            unexpected_body(&json!({"foo": 1})),
            ExchangeError::Payload(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_failed_result() {
        let settings = CoinGeckoSettings {
            base_url: "http://127.0.0.1:9".into(),
            ..CoinGeckoSettings::default()
        };
        let http = build_client(&HttpSettings {
            timeout_secs: 2,
            connect_timeout_secs: 1,
            ..HttpSettings::default()
        })
        .unwrap();
        let client = CoinGeckoClient::new(http, settings, 50);

        let result = client.fetch().await;

        assert_eq!(result.exchange(), ExchangeId::CoinGecko);
        assert!(!result.is_success());
        assert!(result.gainers().is_empty());
        assert!(result.losers().is_empty());
        assert!(!result.error().unwrap().is_empty());
    }
}
