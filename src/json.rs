//! JSON parsing that keeps long numeric literals exact.
//!
//! Exported wizard configurations carry 18-decimal integers (normalization
//! dividers and multipliers, raw fee amounts) that routinely exceed both
//! `2^53` and `u64::MAX`. Tools that read JSON numbers as doubles round them,
//! and `serde_json` itself falls back to `f64` past `u64::MAX`. Percentages
//! with sixteen fraction digits hit the same wall as soon as they become an
//! `f64`. Before structural parsing, every numeric literal in value position
//! whose mantissa has at least [`MIN_QUOTED_DIGITS`] digits is rewritten as a
//! string literal, so it reaches the typed layer untouched.
//!
//! Only literals directly after a `:` are rewritten. Array elements are left
//! alone, and text inside string values that happens to look like
//! `": 1234567890123456,"` is rewritten too, which breaks that document.
//! Neither shape occurs in exported configurations.

use std::sync::LazyLock;

use alloy::primitives::{I256, U256};
use regex::{Captures, Regex};
use serde_json::Value;

/// Literals whose mantissa has at least this many digits are quoted. Shorter
/// ones are exact as `u64`, `i64` or `f64`.
pub const MIN_QUOTED_DIGITS: usize = 16;

static NUMERIC_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(:\s*)(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)(\s*[,}\]])")
        .expect("numeric value pattern is a valid regex")
});

fn mantissa_digits(literal: &str) -> usize {
    literal
        .split(['e', 'E'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .count()
}

/// Quotes long numeric literals in value position, preserving whitespace.
pub fn quote_long_integers(text: &str) -> String {
    NUMERIC_VALUE
        .replace_all(text, |captures: &Captures| {
            if mantissa_digits(&captures[2]) >= MIN_QUOTED_DIGITS {
                format!(r#"{}"{}"{}"#, &captures[1], &captures[2], &captures[3])
            } else {
                captures[0].to_string()
            }
        })
        .into_owned()
}

/// Parses `text` after [`quote_long_integers`]. Long literals come back as
/// JSON strings; read integers with [`big_int_value`] or [`big_uint_value`].
pub fn parse_json_preserving_precision(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&quote_long_integers(text))
}

/// Reads an exact signed integer from either a quoted literal or a JSON
/// integer. Floats yield `None`.
pub fn big_int_value(value: &Value) -> Option<I256> {
    match value {
        Value::String(text) => I256::from_dec_str(text.trim()).ok(),
        Value::Number(number) => number
            .as_i64()
            .and_then(|signed| I256::try_from(signed).ok())
            .or_else(|| number.as_u64().map(|unsigned| I256::from_raw(U256::from(unsigned)))),
        _ => None,
    }
}

/// Unsigned counterpart of [`big_int_value`].
pub fn big_uint_value(value: &Value) -> Option<U256> {
    match value {
        Value::String(text) => U256::from_str_radix(text.trim(), 10).ok(),
        Value::Number(number) => number.as_u64().map(U256::from),
        _ => None,
    }
}
