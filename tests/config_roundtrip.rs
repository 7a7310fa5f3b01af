//! Exported configuration import and export across the public API.

mod common;

use alloy::primitives::U256;
use serde_json::Value;

use silo_wizard::fixed_point::{E18Style, format_wizard_big_int_to_e18, scaled_to_display};
use silo_wizard::json::{big_uint_value, parse_json_preserving_precision};
use silo_wizard::wizard::{
    HookVariant, ImportPolicy, IrmKind, OracleConfig, export_config, import_config, import_value,
};

use common::EXPORTED_CONFIG;

#[test]
fn long_integers_survive_import() {
    let snapshot = import_config(EXPORTED_CONFIG, ImportPolicy::Strict).unwrap();

    let OracleConfig::Chainlink(chainlink) = &snapshot.oracle_configuration.token0 else {
        panic!(
            "expected chainlink oracle, got {:?}",
            snapshot.oracle_configuration.token0
        );
    };
    assert_eq!(
        chainlink.normalization_divider,
        U256::from(10u64).pow(U256::from(24))
    );
    assert_eq!(snapshot.oracle_configuration.token1, OracleConfig::None);
    assert_eq!(snapshot.interest_rate_model.kind, IrmKind::Kink);
    assert_eq!(snapshot.hook, HookVariant::SiloHookV1);
}

#[test]
fn percentages_are_stored_in_wizard_scale() {
    let snapshot = import_config(EXPORTED_CONFIG, ImportPolicy::Lenient).unwrap();
    let token0 = snapshot.borrow_configuration.token0;

    assert_eq!(token0.max_ltv.to_string(), "750000000000000000");
    assert_eq!(
        format_wizard_big_int_to_e18(token0.liquidation_target_ltv, E18Style::Compact),
        "0.825e18"
    );
    assert!(!token0.non_borrowable);
    assert!(snapshot.borrow_configuration.token1.non_borrowable);
    assert_eq!(
        scaled_to_display(snapshot.fees_configuration.token0.liquidation_fee)
            .unwrap()
            .to_string(),
        "4.001"
    );
}

#[test]
fn export_reproduces_the_imported_document() {
    let snapshot = import_config(EXPORTED_CONFIG, ImportPolicy::Strict).unwrap();
    let exported = export_config(&snapshot).unwrap();

    let original = parse_json_preserving_precision(EXPORTED_CONFIG).unwrap();
    let Value::Object(original_fields) = &original else {
        panic!("fixture is an object");
    };

    for (field, value) in original_fields {
        if field == "chainlinkOracle0" {
            assert_eq!(
                big_uint_value(&exported[field]["normalizationDivider"]),
                big_uint_value(&value["normalizationDivider"])
            );
            continue;
        }
        assert_eq!(&exported[field], value, "field {field}");
    }

    let reimported = import_value(exported, ImportPolicy::Strict).unwrap();
    assert_eq!(reimported, snapshot);
}
