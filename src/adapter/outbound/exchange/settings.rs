//! Exchange adapter configuration.

use serde::Deserialize;

use crate::domain::ExchangeId;

const fn default_true() -> bool {
    true
}

/// HTTP client configuration shared by all exchange adapters.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("moverwatch/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// CoinGecko market-data configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Public API base URL.
    #[serde(default = "default_coingecko_url")]
    pub base_url: String,
    /// Pro API base URL, used when an API key is set.
    #[serde(default = "default_coingecko_pro_url")]
    pub pro_base_url: String,
    /// Quote currency for prices and volumes.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Number of coins (by market cap) to scan.
    #[serde(default = "default_top_coins")]
    pub top_coins: usize,
    /// Page size for `coins/markets`; the API caps it at 250.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// API key from `CG_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".into()
}

fn default_coingecko_pro_url() -> String {
    "https://pro-api.coingecko.com/api/v3".into()
}

fn default_vs_currency() -> String {
    "usd".into()
}

const fn default_top_coins() -> usize {
    1000
}

const fn default_per_page() -> usize {
    250
}

impl CoinGeckoSettings {
    /// Base URL to call: the pro endpoint when a key is configured.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        if self.api_key.is_some() {
            &self.pro_base_url
        } else {
            &self.base_url
        }
    }
}

impl Default for CoinGeckoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_coingecko_url(),
            pro_base_url: default_coingecko_pro_url(),
            vs_currency: default_vs_currency(),
            top_coins: default_top_coins(),
            per_page: default_per_page(),
            api_key: None,
        }
    }
}

/// Binance spot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_binance_url")]
    pub base_url: String,
    /// Quote asset that pairs must trade against.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// API key from `BINANCE_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_binance_url() -> String {
    "https://api.binance.com".into()
}

fn default_quote_asset() -> String {
    "USDT".into()
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_binance_url(),
            quote_asset: default_quote_asset(),
            api_key: None,
        }
    }
}

/// Bybit spot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BybitSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bybit_url")]
    pub base_url: String,
    /// Quote coin that pairs must trade against.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// API key from `BYBIT_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_bybit_url() -> String {
    "https://api.bybit.com".into()
}

impl Default for BybitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_bybit_url(),
            quote_asset: default_quote_asset(),
            api_key: None,
        }
    }
}

/// All exchange sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangesConfig {
    #[serde(default)]
    pub coingecko: CoinGeckoSettings,
    #[serde(default)]
    pub binance: BinanceSettings,
    #[serde(default)]
    pub bybit: BybitSettings,
}

impl ExchangesConfig {
    /// Enabled exchanges in fixed registration order.
    #[must_use]
    pub fn enabled(&self) -> Vec<ExchangeId> {
        ExchangeId::ALL
            .into_iter()
            .filter(|id| self.is_enabled(*id))
            .collect()
    }

    #[must_use]
    pub fn is_enabled(&self, exchange: ExchangeId) -> bool {
        match exchange {
            ExchangeId::CoinGecko => self.coingecko.enabled,
            ExchangeId::Binance => self.binance.enabled,
            ExchangeId::Bybit => self.bybit.enabled,
        }
    }

    /// Configured base URL for an exchange, as called.
    #[must_use]
    pub fn base_url(&self, exchange: ExchangeId) -> &str {
        match exchange {
            ExchangeId::CoinGecko => self.coingecko.effective_base_url(),
            ExchangeId::Binance => &self.binance.base_url,
            ExchangeId::Bybit => &self.bybit.base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coingecko_switches_to_pro_url_with_key() {
        let mut settings = CoinGeckoSettings::default();
        assert_eq!(settings.effective_base_url(), "https://api.coingecko.com/api/v3");

        settings.api_key = Some("k".into());
        assert_eq!(
            settings.effective_base_url(),
            "https://pro-api.coingecko.com/api/v3"
        );
    }

    #[test]
    fn enabled_keeps_registration_order() {
        let mut config = ExchangesConfig::default();
        assert_eq!(config.enabled(), ExchangeId::ALL.to_vec());

        config.binance.enabled = false;
        assert_eq!(config.enabled(), vec![ExchangeId::CoinGecko, ExchangeId::Bybit]);
    }

    #[test]
    fn partial_section_uses_defaults() {
        let config: ExchangesConfig = toml::from_str(
            r#"
            [bybit]
            enabled = false
            "#,
        )
        .unwrap();

        assert!(!config.bybit.enabled);
        assert_eq!(config.bybit.base_url, "https://api.bybit.com");
        assert_eq!(config.coingecko.top_coins, 1000);
        assert_eq!(config.binance.quote_asset, "USDT");
    }
}
