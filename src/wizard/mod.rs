//! Wizard snapshot: every step's output in normalized form.
//!
//! The wizard store hands the verifiers a `WizardSnapshot` and receives one
//! back from [`import_config`]. Every percentage is a [`ScaledPercentage`];
//! display values exist only at the edges (user input, exported JSON).

mod export;
mod import;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use silo_fixed_point::ScaledPercentage;

pub use export::{ExportError, export_config};
pub use import::{ImportError, ImportPolicy, import_config, import_value};

/// Sentinel for a token without a solvency oracle.
pub(crate) const NO_ORACLE: &str = "NO_ORACLE";

/// Sentinel selecting the Chainlink oracle family.
pub(crate) const CHAINLINK_ORACLE: &str = "Chainlink";

/// Factory filename selecting the dynamic kink interest-rate model.
pub(crate) const KINK_MODEL_FACTORY: &str = "DynamicKinkModelFactory.sol";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub token_pair: TokenPair,
    pub oracle_configuration: OracleConfiguration,
    pub interest_rate_model: InterestRateModel,
    pub borrow_configuration: BorrowConfiguration,
    pub fees_configuration: FeesConfiguration,
    pub hook: HookVariant,
    pub hook_owner: Option<String>,
    pub last_deployment: Option<LastDeployment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token0: String,
    pub token1: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfiguration {
    pub token0: OracleConfig,
    pub token1: OracleConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OracleConfig {
    #[default]
    None,
    /// A named scaler oracle deployment.
    Scaler { name: String },
    Chainlink(ChainlinkOracle),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainlinkOracle {
    pub base_token: String,
    pub primary_aggregator: String,
    pub secondary_aggregator: String,
    pub normalization_divider: U256,
    pub normalization_multiplier: U256,
    pub invert_second_price: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrmKind {
    Kink,
    #[default]
    Irm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRateModel {
    pub kind: IrmKind,
    /// Factory filename as exported, e.g. `DynamicKinkModelFactory.sol`.
    pub factory: String,
    pub config0: String,
    pub config1: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowConfiguration {
    pub token0: TokenBorrowConfig,
    pub token1: TokenBorrowConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBorrowConfig {
    #[serde(rename = "maxLTV")]
    pub max_ltv: ScaledPercentage,
    pub liquidation_threshold: ScaledPercentage,
    pub liquidation_target_ltv: ScaledPercentage,
    /// Max LTV and liquidation threshold are both zero as written in the
    /// imported document. A value below the sixteen-digit resolution scales to
    /// zero but still counts as non-zero here.
    pub non_borrowable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesConfiguration {
    pub dao_fee: ScaledPercentage,
    pub deployer_fee: ScaledPercentage,
    pub token0: TokenFees,
    pub token1: TokenFees,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFees {
    pub liquidation_fee: ScaledPercentage,
    pub flashloan_fee: ScaledPercentage,
}

/// Hook receiver implementations the wizard can deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookVariant {
    #[default]
    SiloHookV1,
    SiloHookV2,
    SiloHookV3,
}

impl HookVariant {
    pub const ALL: [Self; 3] = [Self::SiloHookV1, Self::SiloHookV2, Self::SiloHookV3];

    /// Implementation filename used in exported configurations.
    pub const fn filename(self) -> &'static str {
        match self {
            Self::SiloHookV1 => "SiloHookV1.sol",
            Self::SiloHookV2 => "SiloHookV2.sol",
            Self::SiloHookV3 => "SiloHookV3.sol",
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.filename() == filename.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastDeployment {
    pub tx_hash: B256,
    pub args_hash: Option<B256>,
}
