//! Implementation version lookups through the on-chain versions lens.
//!
//! One bulk `getVersions` call covers every uncached address. Addresses the
//! bulk call answers with an empty string are asked again one by one, and if
//! the bulk call fails every uncached address is. Answers from successful
//! calls are cached, empty ones included. Failed single lookups are neither
//! cached nor returned, so a transient RPC error is retried next time.

mod cache;

use std::collections::HashMap;

use alloy::primitives::Address;
use alloy::providers::Provider;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::bindings::ISiloVersions;

pub use cache::VersionCache;

pub struct VersionResolver<P> {
    provider: P,
    cache: VersionCache,
}

impl<P: Provider> VersionResolver<P> {
    /// Resolver backed by the process-wide cache.
    pub fn new(provider: P) -> Self {
        Self::with_cache(provider, VersionCache::shared())
    }

    pub fn with_cache(provider: P, cache: VersionCache) -> Self {
        Self { provider, cache }
    }

    /// Versions for `addresses` on `chain_id`. Never fails: addresses whose
    /// lookups all failed are missing from the map.
    #[tracing::instrument(
        skip(self, addresses),
        fields(requested = addresses.len()),
        level = tracing::Level::DEBUG
    )]
    pub async fn resolve(
        &self,
        chain_id: u64,
        lens: Address,
        addresses: &[Address],
    ) -> HashMap<Address, String> {
        let (mut resolved, uncached) = self.cache.partition(chain_id, addresses).await;
        if uncached.is_empty() {
            return resolved;
        }

        let versions_lens = ISiloVersions::new(lens, &self.provider);

        let requery = match versions_lens.getVersions(uncached.clone()).call().await {
            Ok(versions) if versions.len() == uncached.len() => {
                let mut empty = Vec::new();
                for (address, version) in uncached.into_iter().zip(versions) {
                    if version.is_empty() {
                        empty.push(address);
                    } else {
                        self.cache.insert(chain_id, address, version.clone()).await;
                        resolved.insert(address, version);
                    }
                }
                empty
            }
            Ok(versions) => {
                warn!(
                    expected = uncached.len(),
                    returned = versions.len(),
                    "getVersions returned a mismatched list, querying individually"
                );
                uncached
            }
            Err(error) => {
                warn!(%error, "getVersions failed, querying individually");
                uncached
            }
        };

        if requery.is_empty() {
            return resolved;
        }

        debug!(count = requery.len(), "Querying versions individually");

        let lookups = requery.iter().map(|&address| {
            let versions_lens = &versions_lens;
            async move { (address, versions_lens.getVersion(address).call().await) }
        });

        for (address, result) in join_all(lookups).await {
            match result {
                Ok(version) => {
                    self.cache.insert(chain_id, address, version.clone()).await;
                    resolved.insert(address, version);
                }
                Err(error) => {
                    warn!(%address, %error, "getVersion failed, leaving uncached");
                }
            }
        }

        resolved
    }
}
