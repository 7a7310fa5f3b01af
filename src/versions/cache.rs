use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use alloy::primitives::Address;
use tokio::sync::RwLock;

type VersionKey = (u64, Address);

/// Process-wide cache behind [`VersionCache::shared`]. Deployed bytecode
/// never changes, so entries are never evicted.
static SHARED_VERSIONS: LazyLock<VersionCache> = LazyLock::new(VersionCache::default);

/// Versions keyed by chain id and implementation address. An empty string
/// is a cached "queried, no version" answer.
#[derive(Debug, Clone, Default)]
pub struct VersionCache {
    entries: Arc<RwLock<HashMap<VersionKey, String>>>,
}

impl VersionCache {
    pub fn shared() -> Self {
        SHARED_VERSIONS.clone()
    }

    pub async fn get(&self, chain_id: u64, address: Address) -> Option<String> {
        self.entries.read().await.get(&(chain_id, address)).cloned()
    }

    pub async fn insert(&self, chain_id: u64, address: Address, version: String) {
        let mut entries = self.entries.write().await;
        entries.insert((chain_id, address), version);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Splits `addresses` into cached versions and the distinct addresses
    /// still to be queried, keeping first-seen order for the latter.
    pub(super) async fn partition(
        &self,
        chain_id: u64,
        addresses: &[Address],
    ) -> (HashMap<Address, String>, Vec<Address>) {
        let entries = self.entries.read().await;
        let mut cached = HashMap::new();
        let mut uncached = Vec::new();

        for &address in addresses {
            if cached.contains_key(&address) || uncached.contains(&address) {
                continue;
            }

            match entries.get(&(chain_id, address)) {
                Some(version) => {
                    cached.insert(address, version.clone());
                }
                None => uncached.push(address),
            }
        }

        (cached, uncached)
    }
}
