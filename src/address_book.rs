//! Per-chain address book: a JSON object mapping names such as `"WETH"` or
//! `"CHAINLINK_ETH_USD"` to addresses, served at
//! `{base_url}/{chain_segment}.json`.
//!
//! Lookups match keys exactly but ignore case. Fetch failures are logged and
//! reported as "not found"; only successfully parsed documents are cached.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use alloy::primitives::Address;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum AddressBookError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("address book request failed (status {status}): {message}")]
    ApiError { status: StatusCode, message: String },
    #[error("no address book segment configured for chain {0}")]
    UnknownChain(u64),
    #[error("address book at {0} is not a JSON object")]
    NotAnObject(String),
}

/// Maps a chain id to the path segment its document is served under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainSegment {
    pub chain_id: u64,
    pub segment: String,
}

/// Entries keyed by lowercased name.
type Entries = HashMap<String, Address>;

/// Parsed documents keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct AddressBookCache {
    documents: Arc<RwLock<HashMap<String, Arc<Entries>>>>,
}

static SHARED_ADDRESS_BOOKS: LazyLock<AddressBookCache> = LazyLock::new(AddressBookCache::default);

impl AddressBookCache {
    pub fn shared() -> Self {
        SHARED_ADDRESS_BOOKS.clone()
    }

    async fn get(&self, url: &str) -> Option<Arc<Entries>> {
        self.documents.read().await.get(url).cloned()
    }

    async fn insert(&self, url: String, entries: Arc<Entries>) {
        let mut documents = self.documents.write().await;
        documents.insert(url, entries);
    }
}

pub struct AddressBook {
    client: Client,
    base_url: Url,
    chains: Vec<ChainSegment>,
    cache: AddressBookCache,
}

impl AddressBook {
    /// Address book backed by the process-wide document cache.
    pub fn new(base_url: Url, chains: Vec<ChainSegment>) -> Self {
        Self::with_cache(base_url, chains, AddressBookCache::shared())
    }

    pub fn with_cache(base_url: Url, chains: Vec<ChainSegment>, cache: AddressBookCache) -> Self {
        Self {
            client: Client::new(),
            base_url,
            chains,
            cache,
        }
    }

    fn document_url(&self, chain_id: u64) -> Result<String, AddressBookError> {
        let segment = self
            .chains
            .iter()
            .find(|chain| chain.chain_id == chain_id)
            .map(|chain| chain.segment.as_str())
            .ok_or(AddressBookError::UnknownChain(chain_id))?;

        Ok(format!(
            "{}/{segment}.json",
            self.base_url.as_str().trim_end_matches('/')
        ))
    }

    /// Loads the chain's document, from the cache when present.
    pub async fn entries(&self, chain_id: u64) -> Result<Arc<Entries>, AddressBookError> {
        let url = self.document_url(chain_id)?;

        if let Some(entries) = self.cache.get(&url).await {
            return Ok(entries);
        }

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AddressBookError::ApiError { status, message });
        }

        let document: Value = response.json().await?;
        let Value::Object(object) = document else {
            return Err(AddressBookError::NotAnObject(url));
        };

        let entries: Entries = object
            .into_iter()
            .filter_map(|(key, value)| {
                let address = value
                    .as_str()
                    .and_then(|text| Address::from_str(text.trim()).ok());
                if address.is_none() {
                    debug!(%key, "Skipping address book entry without an address");
                }
                address.map(|address| (key.to_lowercase(), address))
            })
            .collect();

        debug!(%url, entries = entries.len(), "Loaded address book");

        let entries = Arc::new(entries);
        self.cache.insert(url, Arc::clone(&entries)).await;
        Ok(entries)
    }

    /// Address stored under `key`, ignoring case. `None` when the key is
    /// missing or the document could not be loaded.
    #[tracing::instrument(skip(self), level = tracing::Level::DEBUG)]
    pub async fn resolve(&self, chain_id: u64, key: &str) -> Option<Address> {
        match self.entries(chain_id).await {
            Ok(entries) => entries.get(&key.to_lowercase()).copied(),
            Err(error) => {
                warn!(%error, "Address book unavailable, treating key as missing");
                None
            }
        }
    }

    /// Whether the book maps `key` to `address`.
    pub async fn contains_address(&self, chain_id: u64, key: &str, address: Address) -> bool {
        self.resolve(chain_id, key).await == Some(address)
    }

    /// Whether `address` appears under any key. Entries are parsed into
    /// [`Address`], so hex case does not matter. Fails closed.
    #[tracing::instrument(skip(self), level = tracing::Level::DEBUG)]
    pub async fn contains(&self, chain_id: u64, address: Address) -> bool {
        match self.entries(chain_id).await {
            Ok(entries) => entries.values().any(|entry| *entry == address),
            Err(error) => {
                warn!(%error, "Address book unavailable, treating address as unknown");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use httpmock::prelude::*;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    const WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    fn book(server: &MockServer) -> AddressBook {
        AddressBook::with_cache(
            Url::parse(&server.base_url()).unwrap(),
            vec![ChainSegment {
                chain_id: 1,
                segment: "mainnet".to_string(),
            }],
            AddressBookCache::default(),
        )
    }

    fn mainnet_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(GET).path("/mainnet.json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "WETH": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
                    "CHAINLINK_ETH_USD": "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419",
                    "comment": 42
                }));
        })
    }

    #[tokio::test]
    async fn resolves_keys_ignoring_case() {
        let server = MockServer::start();
        let mock = mainnet_mock(&server);
        let book = book(&server);

        assert_eq!(book.resolve(1, "weth").await, Some(WETH));
        assert_eq!(book.resolve(1, "WETH").await, Some(WETH));
        assert_eq!(book.resolve(1, "WET").await, None);
        assert_eq!(book.resolve(1, "comment").await, None);

        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn contains_address_compares_the_mapped_address() {
        let server = MockServer::start();
        let _mock = mainnet_mock(&server);
        let book = book(&server);

        assert!(book.contains_address(1, "Weth", WETH).await);
        assert!(
            !book
                .contains_address(1, "CHAINLINK_ETH_USD", WETH)
                .await
        );
    }

    #[tokio::test]
    async fn contains_searches_every_entry_value() {
        let server = MockServer::start();
        let mock = mainnet_mock(&server);
        let book = book(&server);

        assert!(book.contains(1, WETH).await);
        assert!(
            book.contains(1, address!("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419"))
                .await
        );
        assert!(
            !book
                .contains(1, address!("0x1111111111111111111111111111111111111111"))
                .await
        );
        mock.assert_hits(1);
    }

    #[traced_test]
    #[tokio::test]
    async fn contains_fails_closed_when_fetch_fails() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/mainnet.json");
            then.status(500).body("internal error");
        });
        let book = book(&server);

        assert!(!book.contains(1, WETH).await);
        assert!(!book.contains(137, WETH).await);
        assert!(logs_contain("treating address as unknown"));
        mock.assert_hits(1);
    }

    #[traced_test]
    #[tokio::test]
    async fn http_error_fails_closed_and_is_not_cached() {
        let server = MockServer::start();
        let mut failing = server.mock(|when, then| {
            when.method(GET).path("/mainnet.json");
            then.status(503).body("upstream unavailable");
        });
        let book = book(&server);

        assert!(!book.contains_address(1, "WETH", WETH).await);
        assert!(logs_contain("Address book unavailable"));
        failing.assert();
        failing.delete();

        let recovered = mainnet_mock(&server);
        assert_eq!(book.resolve(1, "WETH").await, Some(WETH));
        recovered.assert();
    }

    #[tokio::test]
    async fn unknown_chain_fails_closed_without_request() {
        let server = MockServer::start();
        let mock = mainnet_mock(&server);

        assert_eq!(book(&server).resolve(137, "WETH").await, None);
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn non_object_document_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/mainnet.json");
            then.status(200).json_body(json!(["WETH"]));
        });

        let error = book(&server).entries(1).await.unwrap_err();
        assert!(matches!(error, AddressBookError::NotAnObject(_)));
    }
}
