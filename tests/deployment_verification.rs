//! Imports an exported configuration, decodes the deployment receipt,
//! resolves expected addresses through the address book and checks every
//! field verdict.

mod common;

use alloy::primitives::U256;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;

use silo_wizard::address_book::{AddressBook, AddressBookCache, ChainSegment};
use silo_wizard::deployment::{ShareTokens, decode_deployment};
use silo_wizard::fixed_point::{OnChainAmount, wizard_basis_points_to_scaled};
use silo_wizard::verify::{
    DeploymentVerification, ExpectedAddresses, OnChainSiloReads, SanityWarning, verify_fee,
};
use silo_wizard::wizard::{ImportPolicy, WizardSnapshot, import_config};

use common::{
    EXPORTED_CONFIG, HOOK_OWNER, HOOK0, HOOK1, IMPLEMENTATION, SILO_CONFIG, SILO0, SILO1, USDC,
    WETH, deployment_logs,
};

fn pow10(exponent: u64) -> U256 {
    U256::from(10u64).pow(U256::from(exponent))
}

fn scaled(mantissa: u64, exponent: u64) -> OnChainAmount {
    U256::from(mantissa) * pow10(exponent)
}

fn imported_snapshot() -> WizardSnapshot {
    let mut snapshot = import_config(EXPORTED_CONFIG, ImportPolicy::Strict).unwrap();
    snapshot.hook_owner = Some(HOOK_OWNER.to_string());
    snapshot
}

fn silo0_reads() -> OnChainSiloReads {
    OnChainSiloReads {
        max_ltv: scaled(75, 16),
        lt: scaled(85, 16),
        liquidation_target_ltv: scaled(825, 15),
        dao_fee: scaled(15, 16),
        deployer_fee: scaled(1, 15),
        liquidation_fee: scaled(4, 16),
        flashloan_fee: scaled(5, 14),
        hook_owner: Some(HOOK_OWNER),
        oracle_price: Some(scaled(5, 17)),
        oracle_discount_rate: None,
    }
}

fn silo1_reads() -> OnChainSiloReads {
    OnChainSiloReads {
        dao_fee: scaled(15, 16),
        deployer_fee: scaled(1, 15),
        flashloan_fee: scaled(5, 14),
        hook_owner: Some(HOOK_OWNER),
        ..OnChainSiloReads::default()
    }
}

fn address_book(server: &MockServer) -> AddressBook {
    AddressBook::with_cache(
        Url::parse(&server.base_url()).unwrap(),
        vec![ChainSegment {
            chain_id: 1,
            segment: "mainnet".to_string(),
        }],
        AddressBookCache::default(),
    )
}

async fn expected_addresses(book: &AddressBook) -> ExpectedAddresses {
    ExpectedAddresses {
        token0: book.resolve(1, "WETH").await.map(|address| address.to_string()),
        token1: book.resolve(1, "USDC").await.map(|address| address.to_string()),
        implementation: book
            .resolve(1, "SILO_IMPLEMENTATION")
            .await
            .map(|address| address.to_string()),
    }
}

#[test]
fn receipt_decodes_into_complete_record() {
    let record = decode_deployment(&deployment_logs());

    assert_eq!(record.silo_config, Some(SILO_CONFIG));
    assert_eq!(record.silo0, Some(SILO0));
    assert_eq!(record.silo1, Some(SILO1));
    assert_eq!(record.token0, Some(WETH));
    assert_eq!(record.token1, Some(USDC));
    assert_eq!(record.implementation, Some(IMPLEMENTATION));
    assert_eq!(record.hook0, Some(HOOK0));
    assert_eq!(record.hook1, Some(HOOK1));
    assert_eq!(
        record.share_tokens0.map(|tokens: ShareTokens| tokens.protected),
        Some(alloy::primitives::Address::repeat_byte(0x20))
    );
    assert_eq!(
        record.share_tokens1.map(|tokens| tokens.debt),
        Some(alloy::primitives::Address::repeat_byte(0x32))
    );
}

#[tokio::test]
async fn deployment_matching_the_exported_config_verifies() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/mainnet.json");
        then.status(200).json_body(json!({
            "WETH": WETH.to_string().to_lowercase(),
            "USDC": USDC.to_string(),
            "SILO_IMPLEMENTATION": IMPLEMENTATION.to_string(),
        }));
    });

    let expected = expected_addresses(&address_book(&server)).await;
    let record = decode_deployment(&deployment_logs());
    let report = DeploymentVerification::build(
        &record,
        [&silo0_reads(), &silo1_reads()],
        &imported_snapshot(),
        &expected,
    );

    assert!(report.all_verified(), "{report:#?}");
    assert_eq!(
        report.silo0.warnings,
        vec![SanityWarning::FeeUnexpectedlyHigh { field: "daoFee" }]
    );
    mock.assert_hits(1);
}

#[tokio::test]
async fn unavailable_address_book_leaves_addresses_unverified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/mainnet.json");
        then.status(500);
    });

    let expected = expected_addresses(&address_book(&server)).await;
    let report = DeploymentVerification::build(
        &decode_deployment(&deployment_logs()),
        [&silo0_reads(), &silo1_reads()],
        &imported_snapshot(),
        &expected,
    );

    assert!(!report.implementation);
    assert!(!report.silo0.token);
    assert!(!report.silo1.token);
    assert!(report.silo0.max_ltv);
    assert!(!report.all_verified());
}

#[test]
fn fractional_fee_verifies_against_the_basis_point_amount() {
    let snapshot = imported_snapshot();
    let wizard_fee = snapshot.fees_configuration.token0.liquidation_fee;

    // 4.001 rounds to 400 basis points when deployed.
    let deployed = wizard_basis_points_to_scaled(rust_decimal::Decimal::new(4001, 3)).unwrap();

    assert_eq!(deployed, scaled(4, 16));
    assert!(verify_fee(deployed, Some(wizard_fee)));
    assert!(!verify_fee(scaled(4001, 13), Some(wizard_fee)));
}

#[test]
fn reordered_receipt_swaps_share_token_assignment() {
    let mut logs = deployment_logs();
    logs.swap(1, 2);

    let record = decode_deployment(&logs);

    assert_eq!(
        record.share_tokens0.map(|tokens| tokens.protected),
        Some(alloy::primitives::Address::repeat_byte(0x30))
    );
    assert_eq!(
        record.share_tokens1.map(|tokens| tokens.protected),
        Some(alloy::primitives::Address::repeat_byte(0x20))
    );
}
