//! Generates the flat JSON configuration the deployment scripts consume.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value;
use silo_fixed_point::{NormalizationError, ScaledPercentage, scaled_to_display};

use super::import::{ExportedChainlinkOracle, ExportedConfig, ExportedNumber};
use super::{CHAINLINK_ORACLE, NO_ORACLE, OracleConfig, WizardSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{field} cannot be shown as a display percentage: {source}")]
    Display {
        field: &'static str,
        #[source]
        source: NormalizationError,
    },
    #[error("failed to serialize configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Integers and display decimals that an `f64` reproduces exactly are
/// written as JSON numbers. Everything else is written as a string, which
/// the importer accepts in the same positions.
impl Serialize for ExportedNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self.0.as_str();

        if let Ok(unsigned) = text.parse::<u64>() {
            return serializer.serialize_u64(unsigned);
        }
        if let Ok(signed) = text.parse::<i64>() {
            return serializer.serialize_i64(signed);
        }

        let float_is_exact = text.parse::<f64>().ok().filter(|float| {
            let Ok(exact) = text.parse::<Decimal>() else {
                return false;
            };
            float.is_finite() && float.to_string().parse::<Decimal>().ok() == Some(exact)
        });

        match float_is_exact {
            Some(float) => serializer.serialize_f64(float),
            None => serializer.serialize_str(text),
        }
    }
}

/// Builds the exported JSON object for `snapshot`. Percentages are written
/// as display values; `import_config` of the result rebuilds the snapshot
/// apart from the hook owner and last deployment, which are not exported.
pub fn export_config(snapshot: &WizardSnapshot) -> Result<Value, ExportError> {
    let oracles = &snapshot.oracle_configuration;
    let (solvency_oracle0, chainlink_oracle0) = oracle_fields(&oracles.token0);
    let (solvency_oracle1, chainlink_oracle1) = oracle_fields(&oracles.token1);

    let borrow0 = &snapshot.borrow_configuration.token0;
    let borrow1 = &snapshot.borrow_configuration.token1;
    let fees = &snapshot.fees_configuration;

    let exported = ExportedConfig {
        token0: snapshot.token_pair.token0.clone(),
        token1: snapshot.token_pair.token1.clone(),
        solvency_oracle0,
        solvency_oracle1,
        chainlink_oracle0,
        chainlink_oracle1,
        interest_rate_model0: snapshot.interest_rate_model.factory.clone(),
        interest_rate_model_config0: snapshot.interest_rate_model.config0.clone(),
        interest_rate_model_config1: snapshot.interest_rate_model.config1.clone(),
        max_ltv0: Some(display("maxLtv0", borrow0.max_ltv)?),
        max_ltv1: Some(display("maxLtv1", borrow1.max_ltv)?),
        lt0: Some(display("lt0", borrow0.liquidation_threshold)?),
        lt1: Some(display("lt1", borrow1.liquidation_threshold)?),
        liquidation_target_ltv0: Some(display(
            "liquidationTargetLtv0",
            borrow0.liquidation_target_ltv,
        )?),
        liquidation_target_ltv1: Some(display(
            "liquidationTargetLtv1",
            borrow1.liquidation_target_ltv,
        )?),
        dao_fee: Some(display("daoFee", fees.dao_fee)?),
        deployer_fee: Some(display("deployerFee", fees.deployer_fee)?),
        liquidation_fee0: Some(display("liquidationFee0", fees.token0.liquidation_fee)?),
        liquidation_fee1: Some(display("liquidationFee1", fees.token1.liquidation_fee)?),
        flashloan_fee0: Some(display("flashloanFee0", fees.token0.flashloan_fee)?),
        flashloan_fee1: Some(display("flashloanFee1", fees.token1.flashloan_fee)?),
        hook_receiver_implementation: snapshot.hook.filename().to_string(),
    };

    Ok(serde_json::to_value(exported)?)
}

fn display(field: &'static str, value: ScaledPercentage) -> Result<ExportedNumber, ExportError> {
    scaled_to_display(value)
        .map(|display| ExportedNumber(display.to_string()))
        .map_err(|source| ExportError::Display { field, source })
}

fn integer(value: U256) -> Option<ExportedNumber> {
    Some(ExportedNumber(value.to_string()))
}

fn oracle_fields(oracle: &OracleConfig) -> (String, Option<ExportedChainlinkOracle>) {
    match oracle {
        OracleConfig::None => (NO_ORACLE.to_string(), None),
        OracleConfig::Scaler { name } => (name.clone(), None),
        OracleConfig::Chainlink(chainlink) => (
            CHAINLINK_ORACLE.to_string(),
            Some(ExportedChainlinkOracle {
                base_token: chainlink.base_token.clone(),
                primary_aggregator: chainlink.primary_aggregator.clone(),
                secondary_aggregator: chainlink.secondary_aggregator.clone(),
                normalization_divider: integer(chainlink.normalization_divider),
                normalization_multiplier: integer(chainlink.normalization_multiplier),
                invert_second_price: chainlink.invert_second_price,
            }),
        ),
    }
}
