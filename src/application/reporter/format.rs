//! Number and markup formatting shared by the renderers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero and pad to exactly `dp` decimal places.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    format!("{:.*}", dp as usize, rounded)
}

/// Price with 6 decimals below 1, otherwise 2.
#[must_use]
pub fn price(value: Decimal) -> String {
    if value.abs() < Decimal::ONE {
        fixed(value, 6)
    } else {
        fixed(value, 2)
    }
}

/// Signed percentage with 2 decimals, e.g. `+12.35%` or `-3.00%`.
#[must_use]
pub fn percent(value: Decimal) -> String {
    let body = fixed(value, 2);
    if body.starts_with('-') {
        format!("{body}%")
    } else {
        format!("+{body}%")
    }
}

/// Integer with comma thousands separators, e.g. `1,234,567`.
#[must_use]
pub fn grouped(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = match rounded.abs().to_u128() {
        Some(n) => n.to_string(),
        None => rounded.abs().trunc().to_string(),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Escape text for Telegram HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Coverage grade for the number of ranked assets in a report.
#[must_use]
pub fn coverage_grade(total: usize) -> &'static str {
    if total >= 150 {
        "Excellent"
    } else if total >= 100 {
        "Good"
    } else {
        "Limited"
    }
}
