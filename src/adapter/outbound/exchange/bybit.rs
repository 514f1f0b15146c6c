//! Bybit v5 spot ticker client.
//!
//! Every v5 response is wrapped in a `{retCode, retMsg, result}` envelope;
//! a non-zero `retCode` fails the whole fetch.

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
use super::settings::BybitSettings;
use crate::domain::{AssetObservation, ExchangeId};
use crate::error::ExchangeError;
use crate::port::ExchangeClient;

const API_KEY_HEADER: &str = "X-BAPI-API-KEY";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    #[serde(default)]
    result: Option<ListResult>,
}

#[derive(Debug, Deserialize)]
struct ListResult {
    #[serde(default)]
    list: Vec<Value>,
}

impl Envelope {
    /// Unwrap the result list, failing on a non-zero `retCode`.
    fn into_list(self) -> Result<Vec<Value>, ExchangeError> {
        if self.ret_code != 0 {
            return Err(ExchangeError::Api {
                code: self.ret_code,
                message: if self.ret_msg.is_empty() {
                    "unknown error".into()
                } else {
                    self.ret_msg
                },
            });
        }
        Ok(self.result.map(|r| r.list).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Instrument {
    symbol: String,
    status: String,
    quote_coin: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    symbol: String,
    #[serde(default, deserialize_with = "lenient")]
    last_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    prev_price24h: Option<Decimal>,
    /// Fractional change, e.g. `0.0523` for +5.23%.
    #[serde(default, deserialize_with = "lenient")]
    price24h_pcnt: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    turnover24h: Option<Decimal>,
}

impl Ticker {
    /// Absolute 24h change: from the previous price when present, else
    /// derived from the fractional change.
    fn change(&self) -> Option<Decimal> {
        let last = self.last_price?;
        match self.prev_price24h {
            Some(prev) if !prev.is_zero() => Some(last - prev),
            _ => self.price24h_pcnt.map(|fraction| fraction * last),
        }
    }
}

/// Symbols that are trading against `quote`.
pub fn tradable_symbols(items: Vec<Value>, quote: &str) -> HashSet<String> {
    let (instruments, _) = decode_records::<Instrument>(items);
    instruments
        .into_iter()
        .filter(|i| i.status == "Trading" && i.quote_coin.eq_ignore_ascii_case(quote))
        .map(|i| i.symbol)
        .collect()
}

/// Map tickers for tradable pairs, skipping unusable ones.
pub fn map_tickers(
    items: Vec<Value>,
    tradable: &HashSet<String>,
    quote: &str,
    at: DateTime<Utc>,
) -> Vec<AssetObservation> {
    let (tickers, undecodable) = decode_records::<Ticker>(items);
    let hundred = Decimal::ONE_HUNDRED;
    let observations: Vec<_> = tickers
        .into_iter()
        .filter(|t| tradable.contains(&t.symbol))
        .filter_map(|t| {
            let base = t.symbol.strip_suffix(quote)?.to_string();
            AssetObservation::builder(ExchangeId::Bybit, at)
                .symbol(base.clone())
                .name(base)
                .price(t.last_price)
                .change(t.change())
                .change_percent(t.price24h_pcnt.map(|fraction| fraction * hundred))
                .volume(t.turnover24h)
                .build()
                .ok()
        })
        .collect();
    debug!(exchange = %ExchangeId::Bybit, undecodable, "Ticker mapping finished");
    observations
}

/// Decode an envelope body and unwrap its list.
fn unwrap_envelope(body: Value) -> Result<Vec<Value>, ExchangeError> {
    serde_json::from_value::<Envelope>(body)
        .map_err(ExchangeError::Decode)?
        .into_list()
}

/// Bybit spot market-data client.
pub struct BybitClient {
    http: Client,
    settings: BybitSettings,
    rank_limit: usize,
}

impl BybitClient {
    pub fn new(http: Client, settings: BybitSettings, rank_limit: usize) -> Self {
        Self {
            http,
            settings,
            rank_limit,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .get(format!("{}{}", self.settings.base_url, path))
            .query(&[("category", "spot")]);
        match &self.settings.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl ExchangeClient for BybitClient {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bybit
    }

    fn rank_limit(&self) -> usize {
        self.rank_limit
    }

    async fn observations(&self) -> Result<Vec<AssetObservation>, ExchangeError> {
        let quote = self.settings.quote_asset.as_str();

        let instruments = unwrap_envelope(get_json(self.get("/v5/market/instruments-info")).await?)?;
        let tradable = tradable_symbols(instruments, quote);
        info!(exchange = %ExchangeId::Bybit, pairs = tradable.len(), quote, "Found trading pairs");
        if tradable.is_empty() {
            return Err(ExchangeError::Payload(format!(
                "no {quote} spot pairs in instruments-info"
            )));
        }

        let tickers = unwrap_envelope(get_json(self.get("/v5/market/tickers")).await?)?;
        let observations = map_tickers(tickers, &tradable, quote, Utc::now());
        info!(
            exchange = %ExchangeId::Bybit,
            pairs = observations.len(),
            "Processed pairs with valid data"
        );
        Ok(observations)
    }
}
