//! Shared fixtures for the integration tests: a realistic deployment
//! receipt and the exported configuration that produced it.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, Bytes, IntoLogData, LogData, address, fixed_bytes};
use alloy::rpc::types::Log;

use silo_wizard::bindings::{ISiloDeployer, ISiloFactory};

pub const DEPLOYER: Address = address!("0x931e59f06b83dd3d9a622fd4537989b6c63b9bde");
pub const FACTORY: Address = address!("0x22a3cf6149bfa611bafc89fd721918ec3cf7b581");
pub const SILO_CONFIG: Address = address!("0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0");
pub const IMPLEMENTATION: Address = address!("0x1010101010101010101010101010101010101010");
pub const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
pub const SILO0: Address = address!("0x5050505050505050505050505050505050505050");
pub const SILO1: Address = address!("0x5151515151515151515151515151515151515151");
pub const HOOK0: Address = address!("0x0000000000000000000000000000000000000a00");
pub const HOOK1: Address = address!("0x0000000000000000000000000000000000000b00");
pub const HOOK_OWNER: Address = address!("0x4444444444444444444444444444444444444444");
pub const TX_HASH: B256 =
    fixed_bytes!("0xbeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Exported configuration for a WETH/USDC market.
pub const EXPORTED_CONFIG: &str = r#"{
    "token0": "WETH",
    "token1": "USDC",
    "solvencyOracle0": "Chainlink",
    "solvencyOracle1": "NO_ORACLE",
    "chainlinkOracle0": {
        "baseToken": "WETH",
        "primaryAggregator": "CHAINLINK_ETH_USD",
        "secondaryAggregator": "",
        "normalizationDivider": 1000000000000000000000000,
        "normalizationMultiplier": 0,
        "invertSecondPrice": false
    },
    "interestRateModel0": "DynamicKinkModelFactory.sol",
    "interestRateModelConfig0": "static-1",
    "interestRateModelConfig1": "static-2",
    "maxLtv0": 75,
    "maxLtv1": 0,
    "lt0": 85,
    "lt1": 0,
    "liquidationTargetLtv0": 82.5,
    "liquidationTargetLtv1": 0,
    "daoFee": 15,
    "deployerFee": 0.1,
    "liquidationFee0": 4.001,
    "liquidationFee1": 0,
    "flashloanFee0": 0.05,
    "flashloanFee1": 0.05,
    "hookReceiverImplementation": "SiloHookV1.sol"
}"#;

pub fn log_at(address: Address, data: LogData, log_index: u64) -> Log {
    Log {
        inner: alloy::primitives::Log { address, data },
        block_hash: None,
        block_number: Some(1),
        block_timestamp: None,
        transaction_hash: Some(TX_HASH),
        transaction_index: None,
        log_index: Some(log_index),
        removed: false,
    }
}

pub fn share_tokens(seed: u8) -> ISiloFactory::NewSiloShareTokens {
    ISiloFactory::NewSiloShareTokens {
        protectedShareToken: Address::repeat_byte(seed),
        collateralShareToken: Address::repeat_byte(seed + 1),
        debtShareToken: Address::repeat_byte(seed + 2),
    }
}

/// An ERC20 `Transfer`, the kind of noise every deployment receipt carries.
pub fn transfer_log(log_index: u64) -> Log {
    let transfer = fixed_bytes!("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
    log_at(
        WETH,
        LogData::new_unchecked(
            vec![transfer, B256::ZERO, B256::ZERO],
            Bytes::from(vec![0u8; 32]),
        ),
        log_index,
    )
}

/// Receipt logs in the order the deployer emits them.
pub fn deployment_logs() -> Vec<Log> {
    let new_silo = ISiloFactory::NewSilo {
        implementation: IMPLEMENTATION,
        token0: WETH,
        token1: USDC,
        silo0: SILO0,
        silo1: SILO1,
        siloConfig: SILO_CONFIG,
    };
    let created = ISiloDeployer::SiloCreated {
        siloConfig: SILO_CONFIG,
    };

    vec![
        transfer_log(0),
        log_at(FACTORY, share_tokens(0x20).to_log_data(), 1),
        log_at(FACTORY, share_tokens(0x30).to_log_data(), 2),
        log_at(
            FACTORY,
            ISiloFactory::NewSiloHook {
                silo: SILO0,
                hook: HOOK0,
            }
            .to_log_data(),
            3,
        ),
        log_at(
            FACTORY,
            ISiloFactory::NewSiloHook {
                silo: SILO1,
                hook: HOOK1,
            }
            .to_log_data(),
            4,
        ),
        log_at(FACTORY, new_silo.to_log_data(), 5),
        transfer_log(6),
        log_at(DEPLOYER, created.to_log_data(), 7),
    ]
}
