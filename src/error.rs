use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures while pulling market data from one exchange.
///
/// The `Display` output is what ends up in a failed exchange result, so
/// every variant names what went wrong in terms an operator can act on.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("exchange error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("malformed payload: {0}")]
    Payload(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("report cycle failed: {0}")]
    Cycle(String),

    #[error("notification error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, Error>;
