//! Conversions between display percentages and their integer forms.
//!
//! Two scaling paths exist and must stay separate:
//!
//! - [`display_to_scaled`]: `percentage × 10^16`, truncated. Used for every
//!   percentage field the wizard stores (LTV, thresholds, fees).
//! - [`wizard_basis_points_to_scaled`]: `round(percentage × 100) × 10^14`.
//!   Used where the UI accepts a fee with two decimal places and the value
//!   is first rounded to whole basis points.
//!
//! The two agree for whole-number percentages only.

use alloy::primitives::{I256, Sign, U256};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::scaled::{OnChainAmount, PERCENT_SCALE_DIGITS, ScaledPercentage};

/// Decimal places between one basis point and an 18-decimal amount.
const BASIS_POINT_SCALE_DIGITS: usize = 14;

/// Decimal digits needed for `U256::MAX`; longer results overflow.
const MAX_U256_DIGITS: usize = 78;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("not a decimal number: {0:?}")]
    InvalidNumber(String),
    #[error("value does not fit the scaled integer range: {0}")]
    Overflow(String),
    #[error("basis point value cannot be negative: {0}")]
    NegativeBasisPoints(Decimal),
}

/// Converts display text such as `"4.001"` to `percentage × 10^16`.
///
/// Digits past the 16th fractional place are dropped (truncation toward
/// zero, never rounding). Accepts an optional sign and an optional exponent
/// (`"1e-7"`), since JSON serializers emit that form for small numbers.
pub fn display_to_scaled(text: &str) -> Result<ScaledPercentage, NormalizationError> {
    let parsed = DecimalText::parse(text)?;

    let shift = i64::try_from(PERCENT_SCALE_DIGITS)
        .ok()
        .and_then(|digits| parsed.exponent.checked_add(digits))
        .ok_or_else(|| NormalizationError::Overflow(text.to_string()))?;

    let magnitude = parsed.shifted_integer_digits(shift, text)?;
    let magnitude = U256::from_str_radix(&magnitude, 10)
        .map_err(|_| NormalizationError::Overflow(text.to_string()))?;

    if magnitude.is_zero() {
        return Ok(ScaledPercentage::ZERO);
    }

    let sign = if parsed.negative {
        Sign::Negative
    } else {
        Sign::Positive
    };

    I256::checked_from_sign_and_abs(sign, magnitude)
        .map(ScaledPercentage::from_raw)
        .ok_or_else(|| NormalizationError::Overflow(text.to_string()))
}

/// [`display_to_scaled`] for callers already holding a `Decimal`.
///
/// `Decimal` keeps its exact digits, so formatting it and reparsing the text
/// is lossless.
pub fn display_decimal_to_scaled(value: Decimal) -> Result<ScaledPercentage, NormalizationError> {
    display_to_scaled(&value.to_string())
}

/// Divides by 10^16 for display.
///
/// Exact for anything `Decimal` can hold (28 significant digits); larger
/// magnitudes return [`NormalizationError::Overflow`].
pub fn scaled_to_display(value: ScaledPercentage) -> Result<Decimal, NormalizationError> {
    let overflow = || NormalizationError::Overflow(value.to_string());

    let raw = i128::try_from(value.raw()).map_err(|_| overflow())?;
    let scale = u32::try_from(PERCENT_SCALE_DIGITS).map_err(|_| overflow())?;

    Decimal::try_from_i128_with_scale(raw, scale)
        .map(|display| display.normalize())
        .map_err(|_| overflow())
}

/// Converts a basis-point-precision fee percentage to an 18-decimal amount:
/// `round(bp × 100) × 10^14`.
///
/// Rounds half up because the UI input already has only two decimals;
/// anything finer is noise.
pub fn wizard_basis_points_to_scaled(bp: Decimal) -> Result<OnChainAmount, NormalizationError> {
    if bp.is_sign_negative() && !bp.is_zero() {
        return Err(NormalizationError::NegativeBasisPoints(bp));
    }

    let overflow = || NormalizationError::Overflow(bp.to_string());

    let basis_points = bp
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|hundredths| hundredths.checked_add(Decimal::new(5, 1)))
        .map(|shifted| shifted.floor())
        .and_then(|rounded| rounded.to_u128())
        .ok_or_else(overflow)?;

    let scale = U256::from(10u64).pow(U256::from(BASIS_POINT_SCALE_DIGITS));

    U256::from(basis_points)
        .checked_mul(scale)
        .ok_or_else(overflow)
}

/// A decimal literal split into sign, digits and power-of-ten exponent so
/// that `value = (-1)^negative × digits × 10^(exponent - fraction_len)`.
struct DecimalText {
    negative: bool,
    digits: String,
    fraction_len: usize,
    exponent: i64,
}

impl DecimalText {
    fn parse(text: &str) -> Result<Self, NormalizationError> {
        let invalid = || NormalizationError::InvalidNumber(text.to_string());
        let trimmed = text.trim();

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match unsigned.find(|ch: char| ch == 'e' || ch == 'E') {
            Some(index) => {
                let exponent = unsigned[index + 1..]
                    .parse::<i64>()
                    .map_err(|_| invalid())?;
                (&unsigned[..index], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty())
            || !all_digits(integer)
            || !all_digits(fraction)
        {
            return Err(invalid());
        }

        Ok(Self {
            negative,
            digits: format!("{integer}{fraction}"),
            fraction_len: fraction.len(),
            exponent,
        })
    }

    /// Integer digits of `value × 10^shift`, truncated toward zero, with
    /// leading zeros removed.
    fn shifted_integer_digits(&self, shift: i64, text: &str) -> Result<String, NormalizationError> {
        let overflow = || NormalizationError::Overflow(text.to_string());

        if self.digits.bytes().all(|byte| byte == b'0') {
            return Ok("0".to_string());
        }

        let integer_len = i64::try_from(self.digits.len() - self.fraction_len)
            .map_err(|_| overflow())?;
        let point = integer_len.checked_add(shift).ok_or_else(overflow)?;

        if point <= 0 {
            return Ok("0".to_string());
        }

        let point = usize::try_from(point).map_err(|_| overflow())?;
        let kept = if point >= self.digits.len() {
            let padding = point - self.digits.len();
            if point > MAX_U256_DIGITS + self.leading_zeros() {
                return Err(overflow());
            }
            format!("{}{}", self.digits, "0".repeat(padding))
        } else {
            self.digits[..point].to_string()
        };

        let significant = kept.trim_start_matches('0');
        if significant.len() > MAX_U256_DIGITS {
            return Err(overflow());
        }

        if significant.is_empty() {
            Ok("0".to_string())
        } else {
            Ok(significant.to_string())
        }
    }

    fn leading_zeros(&self) -> usize {
        self.digits.len() - self.digits.trim_start_matches('0').len()
    }
}
