use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Frequency;

/// Largest amount accepted from a form field, in either direction. Larger
/// values are treated as invalid input.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// A user-entered amount together with how often it recurs.
///
/// `frequency` is `None` when the stored frequency key was not recognised;
/// such an input contributes nothing to annual totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonetaryInput {
    pub amount: Decimal,
    pub frequency: Option<Frequency>,
}

impl MonetaryInput {
    /// Creates an input. Negative amounts and amounts above [`MAX_AMOUNT`]
    /// become zero.
    pub fn new(
        amount: Decimal,
        frequency: Frequency,
    ) -> Self {
        Self {
            amount: in_range(amount),
            frequency: Some(frequency),
        }
    }

    pub fn annual(amount: Decimal) -> Self {
        Self::new(amount, Frequency::Annually)
    }

    /// Builds an input from raw form text.
    ///
    /// The amount accepts commas as thousands separators. Unparseable text
    /// becomes zero; an unknown frequency key yields `frequency: None`.
    pub fn from_text(
        amount: &str,
        frequency: &str,
    ) -> Self {
        let parsed = Frequency::parse(frequency);
        if parsed.is_none() {
            warn!(frequency = %frequency, "unrecognized frequency; input contributes zero");
        }
        Self {
            amount: in_range(parse_amount(amount)),
            frequency: parsed,
        }
    }
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_amount_text(s: &str) -> String {
    s.trim().replace([',', '$'], "")
}

fn parse_bounded(normalized: &str) -> Result<Decimal, String> {
    let amount: Decimal = normalized.parse().map_err(|e| format!("{e}"))?;
    if amount.abs() > MAX_AMOUNT {
        return Err(format!("magnitude exceeds {MAX_AMOUNT}"));
    }
    Ok(amount)
}

/// Parses an amount, treating empty, invalid or out-of-range text as zero.
///
/// Invalid (non-empty) input is logged at `warn` level.
pub fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize_amount_text(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    parse_bounded(&normalized).unwrap_or_else(|e| {
        warn!(input = %s, "invalid amount treated as zero: {}", e);
        Decimal::ZERO
    })
}

/// Parses an optional amount. Empty, invalid or out-of-range text yields
/// `None`.
pub fn parse_optional_amount(s: &str) -> Option<Decimal> {
    let normalized = normalize_amount_text(s);
    if normalized.is_empty() {
        return None;
    }
    parse_bounded(&normalized).map_or_else(
        |e| {
            warn!(input = %s, "invalid optional amount: {}", e);
            None
        },
        Some,
    )
}

fn in_range(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(amount = %amount, "negative amount clamped to zero");
        return Decimal::ZERO;
    }
    if amount > MAX_AMOUNT {
        warn!(amount = %amount, "amount out of range treated as zero");
        return Decimal::ZERO;
    }
    amount
}
