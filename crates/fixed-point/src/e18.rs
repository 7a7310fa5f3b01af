//! Scientific-style rendering of 18-decimal integers.
//!
//! `1_500_000_000_000_000_000` renders as `"1.500000000000000000e18"`, i.e.
//! the integer divided by 10^18 followed by the `e18` marker. The division is
//! done on the decimal string, so values far beyond `f64` precision format
//! exactly.

use alloy::primitives::U256;

use crate::scaled::ScaledPercentage;

const E18_DIGITS: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum E18Style {
    /// Always 18 fractional digits: `"0.500000000000000000e18"`.
    #[default]
    Full,
    /// Trailing fractional zeros removed, bare integers have no point:
    /// `"0.5e18"`, `"1e18"`.
    Compact,
}

/// Formats an on-chain 18-decimal integer. Zero is always `"0"`.
pub fn format_big_int_to_e18(value: U256, style: E18Style) -> String {
    format_digits(false, &value.to_string(), style)
}

/// Formats a wizard-scale integer.
///
/// A scaled percentage of `p%` is `p × 10^16`, which is the 18-decimal
/// representation of the fraction `p / 100`, so the output is the same as
/// [`format_big_int_to_e18`] for the same integer.
pub fn format_wizard_big_int_to_e18(value: ScaledPercentage, style: E18Style) -> String {
    let raw = value.raw();
    format_digits(raw.is_negative(), &raw.unsigned_abs().to_string(), style)
}

fn format_digits(negative: bool, digits: &str, style: E18Style) -> String {
    if digits.trim_start_matches('0').is_empty() {
        return "0".to_string();
    }

    let padded = if digits.len() <= E18_DIGITS {
        format!("{digits:0>width$}", width = E18_DIGITS + 1)
    } else {
        digits.to_string()
    };

    let (integer, fraction) = padded.split_at(padded.len() - E18_DIGITS);

    let body = match style {
        E18Style::Full => format!("{integer}.{fraction}"),
        E18Style::Compact => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{integer}.{fraction}")
            }
        }
    };

    let sign = if negative { "-" } else { "" };
    format!("{sign}{body}e18")
}
