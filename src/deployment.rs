//! Deployment results recovered from a deployment transaction's receipt.
//!
//! A receipt carries one `SiloCreated` from the deployer and a `NewSilo`,
//! two `NewSiloShareTokens` and two `NewSiloHook` events from the factory,
//! mixed with token and proxy logs from unrelated contracts. Nothing inside
//! the share-token and hook events says which silo they belong to, so the
//! first occurrence is assigned to silo0 and the second to silo1.

use alloy::primitives::{Address, TxHash};
use alloy::providers::Provider;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use alloy::transports::{RpcError, TransportErrorKind};
use serde::Serialize;
use tracing::{debug, trace};

use crate::bindings::{ISiloDeployer, ISiloFactory};

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("receipt lookup failed: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
    #[error("no receipt found for transaction {0}")]
    ReceiptNotFound(TxHash),
}

/// Share tokens minted for one silo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTokens {
    pub protected: Address,
    pub collateral: Address,
    pub debt: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub silo_config: Option<Address>,
    pub silo0: Option<Address>,
    pub silo1: Option<Address>,
    pub token0: Option<Address>,
    pub token1: Option<Address>,
    pub implementation: Option<Address>,
    pub share_tokens0: Option<ShareTokens>,
    pub share_tokens1: Option<ShareTokens>,
    pub hook0: Option<Address>,
    pub hook1: Option<Address>,
}

/// Fold accumulator: the record plus how many share-token and hook events
/// have been seen so far.
#[derive(Debug, Default)]
struct Decoder {
    record: DeploymentRecord,
    share_tokens_seen: usize,
    hooks_seen: usize,
}

impl Decoder {
    fn apply(mut self, log: &Log) -> Self {
        if let Ok(created) = ISiloDeployer::SiloCreated::decode_log(log.as_ref()) {
            self.record.silo_config = Some(created.data.siloConfig);
            return self;
        }

        if let Ok(new_silo) = ISiloFactory::NewSilo::decode_log(log.as_ref()) {
            let event = new_silo.data;
            self.record.implementation = Some(event.implementation);
            self.record.token0 = Some(event.token0);
            self.record.token1 = Some(event.token1);
            self.record.silo0 = Some(event.silo0);
            self.record.silo1 = Some(event.silo1);
            self.record.silo_config.get_or_insert(event.siloConfig);
        } else if let Ok(share_tokens) =
            ISiloFactory::NewSiloShareTokens::decode_log(log.as_ref())
        {
            let tokens = ShareTokens {
                protected: share_tokens.data.protectedShareToken,
                collateral: share_tokens.data.collateralShareToken,
                debt: share_tokens.data.debtShareToken,
            };
            match self.share_tokens_seen {
                0 => self.record.share_tokens0 = Some(tokens),
                1 => self.record.share_tokens1 = Some(tokens),
                extra => trace!(occurrence = extra + 1, "Ignoring extra NewSiloShareTokens"),
            }
            self.share_tokens_seen += 1;
        } else if let Ok(new_hook) = ISiloFactory::NewSiloHook::decode_log(log.as_ref()) {
            match self.hooks_seen {
                0 => self.record.hook0 = Some(new_hook.data.hook),
                1 => self.record.hook1 = Some(new_hook.data.hook),
                extra => trace!(occurrence = extra + 1, "Ignoring extra NewSiloHook"),
            }
            self.hooks_seen += 1;
        } else {
            trace!(address = %log.address(), "Skipping unrelated log");
        }

        self
    }
}

/// Decodes receipt logs in emission order. Logs that match neither the
/// deployer nor the factory events are skipped.
pub fn decode_deployment(logs: &[Log]) -> DeploymentRecord {
    logs.iter().fold(Decoder::default(), Decoder::apply).record
}

/// Fetches the receipt for `tx_hash` and decodes it.
#[tracing::instrument(skip(provider), level = tracing::Level::DEBUG)]
pub async fn fetch_deployment<P: Provider>(
    provider: P,
    tx_hash: TxHash,
) -> Result<DeploymentRecord, DeploymentError> {
    let receipt = provider
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or(DeploymentError::ReceiptNotFound(tx_hash))?;

    let logs = receipt.inner.logs();
    let record = decode_deployment(logs);

    debug!(
        logs = logs.len(),
        silo_config = ?record.silo_config,
        silo0 = ?record.silo0,
        silo1 = ?record.silo1,
        "Decoded deployment receipt"
    );

    Ok(record)
}
