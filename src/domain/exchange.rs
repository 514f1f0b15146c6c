//! Exchange identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the market-data sources the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    /// CoinGecko aggregated market data.
    CoinGecko,
    /// Binance spot market.
    Binance,
    /// Bybit spot market.
    Bybit,
}

impl ExchangeId {
    /// Every supported exchange, in report order.
    pub const ALL: [Self; 3] = [Self::CoinGecko, Self::Binance, Self::Bybit];

    /// Stable lowercase key used in configuration and snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::Binance => "binance",
            Self::Bybit => "bybit",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CoinGecko => "CoinGecko",
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown exchange '{s}'"))
    }
}
