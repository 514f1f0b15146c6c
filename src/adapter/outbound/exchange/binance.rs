//! Binance spot 24h ticker client.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::decimal::lenient;
use super::http::{decode_records, get_json};
use super::settings::BinanceSettings;
use crate::domain::{AssetObservation, ExchangeId};
use crate::error::ExchangeError;
use crate::port::ExchangeClient;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    #[serde(default)]
    symbols: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol: String,
    status: String,
    quote_asset: String,
    #[serde(default)]
    is_spot_trading_allowed: bool,
}

/// One entry of `GET /api/v3/ticker/24hr`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hr {
    symbol: String,
    #[serde(default, deserialize_with = "lenient")]
    last_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    price_change: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    price_change_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    quote_volume: Option<Decimal>,
}

/// Symbols that are trading on spot against `quote`.
pub fn tradable_symbols(items: Vec<Value>, quote: &str) -> HashSet<String> {
    let (symbols, _) = decode_records::<SymbolInfo>(items);
    symbols
        .into_iter()
        .filter(|s| {
            s.status == "TRADING" && s.quote_asset.eq_ignore_ascii_case(quote) && s.is_spot_trading_allowed
        })
        .map(|s| s.symbol)
        .collect()
}

/// Map tickers for tradable pairs, skipping unusable ones.
pub fn map_tickers(
    items: Vec<Value>,
    tradable: &HashSet<String>,
    quote: &str,
    at: DateTime<Utc>,
) -> Vec<AssetObservation> {
    let (tickers, undecodable) = decode_records::<Ticker24hr>(items);
    let mut incomplete = 0usize;
    let observations: Vec<_> = tickers
        .into_iter()
        .filter(|t| tradable.contains(&t.symbol))
        .filter_map(|t| {
            let base = t.symbol.strip_suffix(quote)?.to_string();
            let built = AssetObservation::builder(ExchangeId::Binance, at)
                .symbol(base.clone())
                .name(base)
                .price(t.last_price)
                .change(t.price_change)
                .change_percent(t.price_change_percent)
                .volume(t.quote_volume)
                .build();
            if built.is_err() {
                incomplete += 1;
            }
            built.ok()
        })
        .collect();
    debug!(
        exchange = %ExchangeId::Binance,
        undecodable,
        incomplete,
        "Ticker mapping finished"
    );
    observations
}

/// Binance spot market-data client.
pub struct BinanceClient {
    http: Client,
    settings: BinanceSettings,
    rank_limit: usize,
}

impl BinanceClient {
    pub fn new(http: Client, settings: BinanceSettings, rank_limit: usize) -> Self {
        Self {
            http,
            settings,
            rank_limit,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.http.get(format!("{}{}", self.settings.base_url, path));
        match &self.settings.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Binance
    }

    fn rank_limit(&self) -> usize {
        self.rank_limit
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        let quote = self.settings.quote_asset.as_str();

        let info: ExchangeInfo = get_json(self.get("/api/v3/exchangeInfo")).await?;
        let tradable = tradable_symbols(info.symbols, quote);
        info!(exchange = %ExchangeId::Binance, pairs = tradable.len(), quote, "Found trading pairs");
        if tradable.is_empty() {
            return Err(ExchangeError::Payload(format!(
                "no {quote} spot pairs in exchangeInfo"
            )));
        }

        let tickers: Vec<Value> = get_json(self.get("/api/v3/ticker/24hr")).await?;
        let observations = map_tickers(tickers, &tradable, quote, Utc::now());
        info!(
            exchange = %ExchangeId::Binance,
            pairs = observations.len(),
            "Processed pairs with valid data"
        );
        Ok(observations)
    }
}
