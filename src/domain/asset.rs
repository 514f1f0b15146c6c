//! Asset observation type with builder pattern.
//!
//! An [`AssetObservation`] is one exchange's 24h view of a single asset,
//! normalized from whatever shape the provider returned. Construction goes
//! through [`AssetObservationBuilder`] so that provider mappers can feed in
//! optional fields and reject incomplete records in one place.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::exchange::ExchangeId;

/// Error returned when building an [`AssetObservation`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetBuildError {
    /// Symbol is required but was missing or blank.
    MissingSymbol,
    /// Last price is required but was not provided.
    MissingPrice,
    /// 24h percentage change is required but was not provided.
    MissingChangePercent,
    /// 24h absolute change is required but was not provided.
    MissingChange,
    /// 24h volume is required but was not provided.
    MissingVolume,
}

impl fmt::Display for AssetBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSymbol => write!(f, "symbol is required"),
            Self::MissingPrice => write!(f, "price is required"),
            Self::MissingChangePercent => write!(f, "24h change percentage is required"),
            Self::MissingChange => write!(f, "24h change is required"),
            Self::MissingVolume => write!(f, "24h volume is required"),
        }
    }
}

impl std::error::Error for AssetBuildError {}

/// A single asset's 24h market statistics as reported by one exchange.
///
/// Immutable once built; use [`AssetObservation::builder`] to construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetObservation {
    symbol: String,
    name: String,
    price: Decimal,
    price_change_24h: Decimal,
    price_change_percentage_24h: Decimal,
    volume_24h: Decimal,
    market_cap: Option<Decimal>,
    rank: Option<u32>,
    exchange: ExchangeId,
    timestamp: DateTime<Utc>,
}

impl AssetObservation {
    /// Create a new builder for an observation from `exchange` at `timestamp`.
    pub fn builder(exchange: ExchangeId, timestamp: DateTime<Utc>) -> AssetObservationBuilder {
        AssetObservationBuilder::new(exchange, timestamp)
    }

    /// Ticker symbol, uppercase.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display name (falls back to the symbol).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last price in USD.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Absolute 24h price change in USD.
    pub fn price_change_24h(&self) -> Decimal {
        self.price_change_24h
    }

    /// 24h price change in percent (e.g. `5.25` for +5.25%).
    pub fn change_percent(&self) -> Decimal {
        self.price_change_percentage_24h
    }

    /// 24h traded volume in USD.
    pub fn volume_24h(&self) -> Decimal {
        self.volume_24h
    }

    /// Market capitalization in USD, when the source reports it.
    pub fn market_cap(&self) -> Option<Decimal> {
        self.market_cap
    }

    /// Market-cap rank, when the source reports it.
    pub fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// Exchange this observation came from.
    pub fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    /// When the observation was taken.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Builder for constructing [`AssetObservation`] instances.
///
/// # Example
///
/// ```ignore
/// let observation = AssetObservation::builder(ExchangeId::Binance, Utc::now())
///     .symbol("BTC")
///     .price(Some(dec!(64000)))
///     .change(Some(dec!(1200)))
///     .change_percent(Some(dec!(1.91)))
///     .volume(Some(dec!(1500000000)))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct AssetObservationBuilder {
    exchange: ExchangeId,
    timestamp: DateTime<Utc>,
    symbol: Option<String>,
    name: Option<String>,
    price: Option<Decimal>,
    change: Option<Decimal>,
    change_percent: Option<Decimal>,
    volume: Option<Decimal>,
    market_cap: Option<Decimal>,
    rank: Option<u32>,
}

impl AssetObservationBuilder {
    /// Create a new empty builder.
    pub fn new(exchange: ExchangeId, timestamp: DateTime<Utc>) -> Self {
        Self {
            exchange,
            timestamp,
            symbol: None,
            name: None,
            price: None,
            change: None,
            change_percent: None,
            volume: None,
            market_cap: None,
            rank: None,
        }
    }

    /// Set the ticker symbol. Stored uppercase.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the last price.
    pub fn price(mut self, price: Option<Decimal>) -> Self {
        self.price = price;
        self
    }

    /// Set the absolute 24h change.
    pub fn change(mut self, change: Option<Decimal>) -> Self {
        self.change = change;
        self
    }

    /// Set the 24h change percentage.
    pub fn change_percent(mut self, change_percent: Option<Decimal>) -> Self {
        self.change_percent = change_percent;
        self
    }

    /// Set the 24h USD volume.
    pub fn volume(mut self, volume: Option<Decimal>) -> Self {
        self.volume = volume;
        self
    }

    /// Set market capitalization and rank.
    pub fn market_cap(mut self, market_cap: Option<Decimal>, rank: Option<u32>) -> Self {
        self.market_cap = market_cap;
        self.rank = rank;
        self
    }

    /// Build the observation.
    ///
    /// A missing percentage change is derived from the price and the
    /// absolute change.
    ///
    /// # Errors
    ///
    /// Returns [`AssetBuildError`] if the symbol is blank or any required
    /// numeric field is missing.
    pub fn build(self) -> Result<AssetObservation, AssetBuildError> {
        let symbol = self
            .symbol
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or(AssetBuildError::MissingSymbol)?;
        let price = self.price.ok_or(AssetBuildError::MissingPrice)?;
        let change = self.change.ok_or(AssetBuildError::MissingChange)?;
        let change_percent = match self.change_percent {
            Some(pct) => pct,
            None => derive_change_percent(price, change)
                .ok_or(AssetBuildError::MissingChangePercent)?,
        };
        let volume = self.volume.ok_or(AssetBuildError::MissingVolume)?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| symbol.clone());

        Ok(AssetObservation {
            symbol,
            name,
            price,
            price_change_24h: change,
            price_change_percentage_24h: change_percent,
            volume_24h: volume,
            market_cap: self.market_cap,
            rank: self.rank,
            exchange: self.exchange,
            timestamp: self.timestamp,
        })
    }
}

/// Percentage move implied by the current price and the absolute delta.
///
/// `None` when the price 24h ago was zero.
fn derive_change_percent(price: Decimal, change: Decimal) -> Option<Decimal> {
    let open = price - change;
    if open.is_zero() {
        return None;
    }
    (change * Decimal::ONE_HUNDRED).checked_div(open)
}
