//! Per-field verdicts comparing deployed values with wizard expectations.
//!
//! Every verifier returns a plain `bool`. A missing expectation is
//! unverifiable and reported as `false`, the same as a mismatch. Numeric
//! comparisons are exact on the normalized integers, no tolerance.

mod registry;
pub mod report;

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use silo_fixed_point::{
    OnChainAmount, ScaledPercentage, scaled_to_display, wizard_basis_points_to_scaled,
};

pub use registry::is_silo_registered;
pub use report::{
    DeploymentVerification, ExpectedAddresses, OnChainSiloReads, SanityWarning, SiloVerification,
};

fn e18(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18))
}

fn e16(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(16))
}

fn addresses_match(on_chain: Address, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return false;
    };

    Address::from_str(expected.trim()).is_ok_and(|expected| expected == on_chain)
}

fn amounts_match(on_chain: OnChainAmount, expected: Option<ScaledPercentage>) -> bool {
    expected
        .and_then(ScaledPercentage::to_on_chain)
        .is_some_and(|expected| expected == on_chain)
}

/// Token address from the deployment against the wizard's token. Hex case is
/// ignored.
pub fn verify_token_address(on_chain: Address, wizard: Option<&str>) -> bool {
    addresses_match(on_chain, wizard)
}

pub fn verify_hook_owner(on_chain: Address, wizard: Option<&str>) -> bool {
    addresses_match(on_chain, wizard)
}

pub fn verify_implementation_address(on_chain: Address, wizard: Option<&str>) -> bool {
    addresses_match(on_chain, wizard)
}

/// Fee read from the silo config against the wizard's fee. Fees are
/// deployed through the basis-point path, so the expectation is
/// `round(display × 100) × 10^14`, not the ×10^16 storage value.
pub fn verify_fee(on_chain: OnChainAmount, wizard: Option<ScaledPercentage>) -> bool {
    wizard
        .and_then(|fee| scaled_to_display(fee).ok())
        .and_then(|display| wizard_basis_points_to_scaled(display).ok())
        .is_some_and(|expected| expected == on_chain)
}

/// Max LTV, liquidation threshold or liquidation target LTV.
pub fn verify_ltv_threshold(on_chain: OnChainAmount, wizard: Option<ScaledPercentage>) -> bool {
    amounts_match(on_chain, wizard)
}

/// Oracle quote above 1000 in 18-decimal units.
pub fn is_price_unexpectedly_high(price: U256) -> bool {
    price > e18(1000)
}

/// Oracle quote below 0.1, usually a decimals mismatch.
pub fn is_price_unexpectedly_low(price: U256) -> bool {
    price < U256::from(10u64).pow(U256::from(17))
}

pub fn is_price_decimals_suspect(price: U256) -> bool {
    let digits = price.to_string().len();
    !(16..=22).contains(&digits)
}

/// Annualized discount outside 10%..=40%.
pub fn is_discount_rate_out_of_range(rate: U256) -> bool {
    rate < e16(10) || rate > e16(40)
}

/// Fee above 5% on the basis-point path (`5 × 100 × 10^14`).
pub fn is_fee_unexpectedly_high(fee: OnChainAmount) -> bool {
    let ceiling = U256::from(5u64 * 100) * U256::from(10u64).pow(U256::from(14));
    fee > ceiling
}
