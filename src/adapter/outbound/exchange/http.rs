//! Shared HTTP plumbing for exchange adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::settings::HttpSettings;
use crate::error::ExchangeError;

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 200;

/// Build the HTTP client used by every exchange adapter.
pub fn build_client(settings: &HttpSettings) -> Result<Client, ExchangeError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()?)
}

/// Send a GET request and decode the JSON body.
///
/// Non-2xx responses become [`ExchangeError::Status`] carrying the start of
/// the body; undecodable bodies become [`ExchangeError::Decode`].
pub async fn get_json<T>(request: RequestBuilder) -> Result<T, ExchangeError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(url = %url, status = status.as_u16(), "Exchange returned error status");
        return Err(ExchangeError::Status {
            status: status.as_u16(),
            body: truncate(body.trim(), MAX_ERROR_BODY),
        });
    }

    let bytes = response.bytes().await?;
    debug!(url = %url, bytes = bytes.len(), "Exchange response received");
    serde_json::from_slice(&bytes).map_err(ExchangeError::Decode)
}

/// Decode each element of a JSON array independently, skipping bad records.
///
/// Returns the decoded records and the number skipped.
pub fn decode_records<T>(items: Vec<Value>) -> (Vec<T>, usize)
where
    T: DeserializeOwned,
{
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    let skipped = total - decoded.len();
    (decoded, skipped)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
