//! Lenient decimal decoding for exchange payloads.
//!
//! Exchanges send numbers as JSON numbers, decimal strings, scientific
//! notation, empty strings, or null. Anything that is not a usable number
//! decodes to `None` so the mapping layer can decide whether the field was
//! required.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn parse(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// `deserialize_with` helper for optional decimal fields.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse(&s),
        Some(Value::Number(n)) => parse(&n.to_string()),
        _ => None,
    })
}
