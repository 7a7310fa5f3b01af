//! Runs every field verifier over one deployment.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use silo_fixed_point::OnChainAmount;

use super::{
    is_discount_rate_out_of_range, is_fee_unexpectedly_high, is_price_decimals_suspect,
    is_price_unexpectedly_high, is_price_unexpectedly_low, verify_fee, verify_hook_owner,
    verify_implementation_address, verify_ltv_threshold, verify_token_address,
};
use crate::deployment::DeploymentRecord;
use crate::wizard::{TokenBorrowConfig, TokenFees, WizardSnapshot};

/// Values read from one silo's config after deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnChainSiloReads {
    pub max_ltv: OnChainAmount,
    pub lt: OnChainAmount,
    pub liquidation_target_ltv: OnChainAmount,
    pub dao_fee: OnChainAmount,
    pub deployer_fee: OnChainAmount,
    pub liquidation_fee: OnChainAmount,
    pub flashloan_fee: OnChainAmount,
    pub hook_owner: Option<Address>,
    /// Solvency oracle quote for one unit of the silo's token.
    pub oracle_price: Option<U256>,
    pub oracle_discount_rate: Option<U256>,
}

/// Addresses the wizard expects, typically resolved through the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedAddresses {
    pub token0: Option<String>,
    pub token1: Option<String>,
    pub implementation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "warning")]
pub enum SanityWarning {
    PriceUnexpectedlyHigh,
    PriceUnexpectedlyLow,
    PriceDecimalsSuspect,
    DiscountRateOutOfRange,
    FeeUnexpectedlyHigh { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiloVerification {
    pub token: bool,
    pub hook_owner: bool,
    pub max_ltv: bool,
    pub liquidation_threshold: bool,
    pub liquidation_target_ltv: bool,
    pub dao_fee: bool,
    pub deployer_fee: bool,
    pub liquidation_fee: bool,
    pub flashloan_fee: bool,
    pub warnings: Vec<SanityWarning>,
}

impl SiloVerification {
    fn build(
        token: Option<Address>,
        expected_token: Option<&str>,
        reads: &OnChainSiloReads,
        snapshot: &WizardSnapshot,
        borrow: &TokenBorrowConfig,
        fees: &TokenFees,
    ) -> Self {
        let global = &snapshot.fees_configuration;

        Self {
            token: token.is_some_and(|token| verify_token_address(token, expected_token)),
            hook_owner: reads.hook_owner.is_some_and(|owner| {
                verify_hook_owner(owner, snapshot.hook_owner.as_deref())
            }),
            max_ltv: verify_ltv_threshold(reads.max_ltv, Some(borrow.max_ltv)),
            liquidation_threshold: verify_ltv_threshold(
                reads.lt,
                Some(borrow.liquidation_threshold),
            ),
            liquidation_target_ltv: verify_ltv_threshold(
                reads.liquidation_target_ltv,
                Some(borrow.liquidation_target_ltv),
            ),
            dao_fee: verify_fee(reads.dao_fee, Some(global.dao_fee)),
            deployer_fee: verify_fee(reads.deployer_fee, Some(global.deployer_fee)),
            liquidation_fee: verify_fee(reads.liquidation_fee, Some(fees.liquidation_fee)),
            flashloan_fee: verify_fee(reads.flashloan_fee, Some(fees.flashloan_fee)),
            warnings: sanity_warnings(reads),
        }
    }

    pub fn all_verified(&self) -> bool {
        self.token
            && self.hook_owner
            && self.max_ltv
            && self.liquidation_threshold
            && self.liquidation_target_ltv
            && self.dao_fee
            && self.deployer_fee
            && self.liquidation_fee
            && self.flashloan_fee
    }
}

fn sanity_warnings(reads: &OnChainSiloReads) -> Vec<SanityWarning> {
    let mut warnings = Vec::new();

    if let Some(price) = reads.oracle_price {
        if is_price_unexpectedly_high(price) {
            warnings.push(SanityWarning::PriceUnexpectedlyHigh);
        }
        if is_price_unexpectedly_low(price) {
            warnings.push(SanityWarning::PriceUnexpectedlyLow);
        }
        if is_price_decimals_suspect(price) {
            warnings.push(SanityWarning::PriceDecimalsSuspect);
        }
    }

    if reads
        .oracle_discount_rate
        .is_some_and(is_discount_rate_out_of_range)
    {
        warnings.push(SanityWarning::DiscountRateOutOfRange);
    }

    let fees = [
        ("daoFee", reads.dao_fee),
        ("deployerFee", reads.deployer_fee),
        ("liquidationFee", reads.liquidation_fee),
        ("flashloanFee", reads.flashloan_fee),
    ];
    warnings.extend(
        fees.into_iter()
            .filter(|(_, fee)| is_fee_unexpectedly_high(*fee))
            .map(|(field, _)| SanityWarning::FeeUnexpectedlyHigh { field }),
    );

    warnings
}

/// Verdicts for a whole deployment: shared fields plus one block per silo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentVerification {
    pub implementation: bool,
    pub silo0: SiloVerification,
    pub silo1: SiloVerification,
}

impl DeploymentVerification {
    pub fn build(
        record: &DeploymentRecord,
        reads: [&OnChainSiloReads; 2],
        snapshot: &WizardSnapshot,
        expected: &ExpectedAddresses,
    ) -> Self {
        let [reads0, reads1] = reads;

        Self {
            implementation: record.implementation.is_some_and(|implementation| {
                verify_implementation_address(implementation, expected.implementation.as_deref())
            }),
            silo0: SiloVerification::build(
                record.token0,
                expected.token0.as_deref(),
                reads0,
                snapshot,
                &snapshot.borrow_configuration.token0,
                &snapshot.fees_configuration.token0,
            ),
            silo1: SiloVerification::build(
                record.token1,
                expected.token1.as_deref(),
                reads1,
                snapshot,
                &snapshot.borrow_configuration.token1,
                &snapshot.fees_configuration.token1,
            ),
        }
    }

    pub fn all_verified(&self) -> bool {
        self.implementation && self.silo0.all_verified() && self.silo1.all_verified()
    }
}
