use std::fmt::{Debug, Display};
use std::str::FromStr;

use alloy::primitives::{I256, ParseSignedError, U256};
use serde::{Deserialize, Serialize};

/// 18-decimal fixed-point integer as held by the contracts.
pub type OnChainAmount = U256;

/// Number of decimal places between a display percentage and its scaled form.
pub(crate) const PERCENT_SCALE_DIGITS: usize = 16;

/// 10^16, one percent in scaled form.
pub(crate) fn percent_unit() -> U256 {
    U256::from(10u64).pow(U256::from(PERCENT_SCALE_DIGITS))
}

/// A percentage multiplied by 10^16, held as an exact integer.
///
/// `ScaledPercentage` never passes through binary floating point: it is
/// built by [`display_to_scaled`](crate::display_to_scaled) from decimal text
/// and compared as an integer by the verifiers. `75%` is
/// `750_000_000_000_000_000`.
///
/// Serializes as a decimal string so JSON consumers that read numbers as
/// doubles cannot round it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledPercentage(I256);

impl ScaledPercentage {
    pub const ZERO: Self = Self(I256::ZERO);

    pub const fn from_raw(value: I256) -> Self {
        Self(value)
    }

    /// `percent` whole percent, e.g. `from_whole_percent(40)` is `40 × 10^16`.
    pub fn from_whole_percent(percent: u64) -> Self {
        Self(I256::from_raw(U256::from(percent) * percent_unit()))
    }

    pub const fn raw(self) -> I256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_negative()
    }

    /// The same integer as an on-chain amount. `None` for negative values,
    /// which no contract field can hold.
    pub fn to_on_chain(self) -> Option<OnChainAmount> {
        if self.0.is_negative() {
            None
        } else {
            Some(self.0.into_raw())
        }
    }
}

impl Default for ScaledPercentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<I256> for ScaledPercentage {
    fn from(value: I256) -> Self {
        Self(value)
    }
}

impl From<ScaledPercentage> for I256 {
    fn from(value: ScaledPercentage) -> Self {
        value.0
    }
}

impl Debug for ScaledPercentage {
    fn fmt(&self, dest: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(dest, "ScaledPercentage({})", self.0)
    }
}

impl Display for ScaledPercentage {
    fn fmt(&self, dest: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(dest, "{}", self.0)
    }
}

/// Parses the raw scaled integer (`"750000000000000000"`), not a display
/// percentage.
impl FromStr for ScaledPercentage {
    type Err = ParseSignedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        I256::from_dec_str(value.trim()).map(Self)
    }
}

impl Serialize for ScaledPercentage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScaled {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for ScaledPercentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawScaled::deserialize(deserializer)? {
            RawScaled::Text(text) => text.parse().map_err(serde::de::Error::custom),
            RawScaled::Unsigned(value) => Ok(Self(I256::from_raw(U256::from(value)))),
            RawScaled::Signed(value) => I256::try_from(value)
                .map(Self)
                .map_err(serde::de::Error::custom),
        }
    }
}
