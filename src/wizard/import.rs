//! Rebuilds a [`WizardSnapshot`] from an exported JSON configuration.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use silo_fixed_point::{NormalizationError, ScaledPercentage, display_to_scaled};
use tracing::{debug, warn};

use super::{
    BorrowConfiguration, CHAINLINK_ORACLE, ChainlinkOracle, FeesConfiguration, HookVariant,
    InterestRateModel, IrmKind, KINK_MODEL_FACTORY, NO_ORACLE, OracleConfig, OracleConfiguration,
    TokenBorrowConfig, TokenFees, TokenPair, WizardSnapshot,
};
use crate::json::parse_json_preserving_precision;

/// How to treat sentinel values the importer does not recognize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPolicy {
    /// Unknown hook filenames select the first hook variant and any oracle
    /// name that is not a sentinel selects a scaler oracle.
    #[default]
    Lenient,
    /// Unknown hook filenames and empty oracle names are import errors.
    Strict,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid percentage in {field}: {source}")]
    InvalidPercentage {
        field: &'static str,
        #[source]
        source: NormalizationError,
    },
    #[error("invalid integer in {field}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("unknown hook receiver implementation: {0:?}")]
    UnknownHookImplementation(String),
    #[error("solvency oracle for token{0} is empty")]
    MissingOracleName(u8),
}

/// A JSON number or string, kept as its literal text so no digits are lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportedNumber(pub(crate) String);

impl<'de> Deserialize<'de> for ExportedNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Ok(Self(number.to_string())),
            Value::String(text) => Ok(Self(text)),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or numeric string, got {other}"
            ))),
        }
    }
}

/// Flat exported configuration, field names as the deployment scripts read
/// them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ExportedConfig {
    pub(crate) token0: String,
    pub(crate) token1: String,
    pub(crate) solvency_oracle0: String,
    pub(crate) solvency_oracle1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) chainlink_oracle0: Option<ExportedChainlinkOracle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) chainlink_oracle1: Option<ExportedChainlinkOracle>,
    pub(crate) interest_rate_model0: String,
    pub(crate) interest_rate_model_config0: String,
    pub(crate) interest_rate_model_config1: String,
    pub(crate) max_ltv0: Option<ExportedNumber>,
    pub(crate) max_ltv1: Option<ExportedNumber>,
    pub(crate) lt0: Option<ExportedNumber>,
    pub(crate) lt1: Option<ExportedNumber>,
    pub(crate) liquidation_target_ltv0: Option<ExportedNumber>,
    pub(crate) liquidation_target_ltv1: Option<ExportedNumber>,
    pub(crate) dao_fee: Option<ExportedNumber>,
    pub(crate) deployer_fee: Option<ExportedNumber>,
    pub(crate) liquidation_fee0: Option<ExportedNumber>,
    pub(crate) liquidation_fee1: Option<ExportedNumber>,
    pub(crate) flashloan_fee0: Option<ExportedNumber>,
    pub(crate) flashloan_fee1: Option<ExportedNumber>,
    pub(crate) hook_receiver_implementation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ExportedChainlinkOracle {
    pub(crate) base_token: String,
    pub(crate) primary_aggregator: String,
    pub(crate) secondary_aggregator: String,
    pub(crate) normalization_divider: Option<ExportedNumber>,
    pub(crate) normalization_multiplier: Option<ExportedNumber>,
    pub(crate) invert_second_price: bool,
}

/// Parses exported JSON text (long integers kept exact) and rebuilds the
/// snapshot. Malformed JSON is an error, never a default snapshot.
pub fn import_config(text: &str, policy: ImportPolicy) -> Result<WizardSnapshot, ImportError> {
    let value = parse_json_preserving_precision(text)?;
    import_value(value, policy)
}

/// [`import_config`] for an already parsed document.
pub fn import_value(value: Value, policy: ImportPolicy) -> Result<WizardSnapshot, ImportError> {
    let exported: ExportedConfig = serde_json::from_value(value)?;

    let oracle_configuration = OracleConfiguration {
        token0: oracle_config(
            0,
            &exported.solvency_oracle0,
            exported.chainlink_oracle0.as_ref(),
            policy,
        )?,
        token1: oracle_config(
            1,
            &exported.solvency_oracle1,
            exported.chainlink_oracle1.as_ref(),
            policy,
        )?,
    };

    let borrow_configuration = BorrowConfiguration {
        token0: token_borrow_config(
            ("maxLtv0", exported.max_ltv0.as_ref()),
            ("lt0", exported.lt0.as_ref()),
            ("liquidationTargetLtv0", exported.liquidation_target_ltv0.as_ref()),
        )?,
        token1: token_borrow_config(
            ("maxLtv1", exported.max_ltv1.as_ref()),
            ("lt1", exported.lt1.as_ref()),
            ("liquidationTargetLtv1", exported.liquidation_target_ltv1.as_ref()),
        )?,
    };

    let fees_configuration = FeesConfiguration {
        dao_fee: percentage("daoFee", exported.dao_fee.as_ref())?,
        deployer_fee: percentage("deployerFee", exported.deployer_fee.as_ref())?,
        token0: TokenFees {
            liquidation_fee: percentage("liquidationFee0", exported.liquidation_fee0.as_ref())?,
            flashloan_fee: percentage("flashloanFee0", exported.flashloan_fee0.as_ref())?,
        },
        token1: TokenFees {
            liquidation_fee: percentage("liquidationFee1", exported.liquidation_fee1.as_ref())?,
            flashloan_fee: percentage("flashloanFee1", exported.flashloan_fee1.as_ref())?,
        },
    };

    let interest_rate_model = InterestRateModel {
        kind: if exported.interest_rate_model0 == KINK_MODEL_FACTORY {
            IrmKind::Kink
        } else {
            IrmKind::Irm
        },
        factory: exported.interest_rate_model0,
        config0: exported.interest_rate_model_config0,
        config1: exported.interest_rate_model_config1,
    };

    let hook = hook_variant(&exported.hook_receiver_implementation, policy)?;

    debug!(
        token0 = %exported.token0,
        token1 = %exported.token1,
        ?hook,
        "Imported wizard configuration"
    );

    Ok(WizardSnapshot {
        token_pair: TokenPair {
            token0: exported.token0,
            token1: exported.token1,
        },
        oracle_configuration,
        interest_rate_model,
        borrow_configuration,
        fees_configuration,
        hook,
        hook_owner: None,
        last_deployment: None,
    })
}

fn percentage(
    field: &'static str,
    value: Option<&ExportedNumber>,
) -> Result<ScaledPercentage, ImportError> {
    let Some(ExportedNumber(text)) = value else {
        return Ok(ScaledPercentage::ZERO);
    };

    display_to_scaled(text).map_err(|source| ImportError::InvalidPercentage { field, source })
}

fn big_integer(field: &'static str, value: Option<&ExportedNumber>) -> Result<U256, ImportError> {
    let Some(ExportedNumber(text)) = value else {
        return Ok(U256::ZERO);
    };

    U256::from_str_radix(text.trim(), 10).map_err(|_| ImportError::InvalidInteger {
        field,
        value: text.clone(),
    })
}

fn token_borrow_config(
    max_ltv: (&'static str, Option<&ExportedNumber>),
    lt: (&'static str, Option<&ExportedNumber>),
    target_ltv: (&'static str, Option<&ExportedNumber>),
) -> Result<TokenBorrowConfig, ImportError> {
    let non_borrowable = display_is_zero(max_ltv.1) && display_is_zero(lt.1);

    Ok(TokenBorrowConfig {
        max_ltv: percentage(max_ltv.0, max_ltv.1)?,
        liquidation_threshold: percentage(lt.0, lt.1)?,
        liquidation_target_ltv: percentage(target_ltv.0, target_ltv.1)?,
        non_borrowable,
    })
}

/// Zero as written, before any truncation to sixteen fraction digits. An
/// absent field counts as zero.
fn display_is_zero(value: Option<&ExportedNumber>) -> bool {
    value.is_none_or(|ExportedNumber(text)| {
        text.trim()
            .trim_start_matches(['-', '+'])
            .split(['e', 'E'])
            .next()
            .unwrap_or_default()
            .chars()
            .all(|c| c == '0' || c == '.')
    })
}

fn oracle_config(
    token: u8,
    solvency_oracle: &str,
    chainlink: Option<&ExportedChainlinkOracle>,
    policy: ImportPolicy,
) -> Result<OracleConfig, ImportError> {
    match solvency_oracle {
        NO_ORACLE => Ok(OracleConfig::None),
        CHAINLINK_ORACLE => {
            let exported = chainlink.cloned().unwrap_or_default();
            Ok(OracleConfig::Chainlink(ChainlinkOracle {
                base_token: exported.base_token,
                primary_aggregator: exported.primary_aggregator,
                secondary_aggregator: exported.secondary_aggregator,
                normalization_divider: big_integer(
                    "normalizationDivider",
                    exported.normalization_divider.as_ref(),
                )?,
                normalization_multiplier: big_integer(
                    "normalizationMultiplier",
                    exported.normalization_multiplier.as_ref(),
                )?,
                invert_second_price: exported.invert_second_price,
            }))
        }
        name if name.trim().is_empty() && policy == ImportPolicy::Strict => {
            Err(ImportError::MissingOracleName(token))
        }
        name => Ok(OracleConfig::Scaler {
            name: name.to_string(),
        }),
    }
}

fn hook_variant(filename: &str, policy: ImportPolicy) -> Result<HookVariant, ImportError> {
    if let Some(variant) = HookVariant::from_filename(filename) {
        return Ok(variant);
    }

    match policy {
        ImportPolicy::Strict => Err(ImportError::UnknownHookImplementation(filename.to_string())),
        ImportPolicy::Lenient => {
            warn!(
                filename,
                fallback = HookVariant::SiloHookV1.filename(),
                "Unknown hook receiver implementation, using first variant"
            );
            Ok(HookVariant::SiloHookV1)
        }
    }
}
