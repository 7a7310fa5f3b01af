use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use clap::Parser;
use serde::Deserialize;
use tracing::Level;
use url::Url;

use crate::address_book::{AddressBook, ChainSegment};
use crate::wizard::ImportPolicy;

#[derive(Parser, Debug)]
pub struct Env {
    /// Path to TOML configuration file. Commands that only transform local
    /// input run without one.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// Settings deserialized from the config TOML.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    log_level: Option<LogLevel>,
    import_policy: Option<ImportPolicy>,
    chain: Option<ChainConfig>,
    address_book: Option<AddressBookConfig>,
}

/// Network the deployment lives on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub silo_factory: Address,
    pub versions_lens: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressBookConfig {
    pub base_url: Url,
    #[serde(default)]
    pub chains: Vec<ChainSegment>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: LogLevel,
    pub import_policy: ImportPolicy,
    pub chain: Option<ChainConfig>,
    pub address_book: Option<AddressBookConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            import_policy: ImportPolicy::default(),
            chain: None,
            address_book: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        (*log_level).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML")]
    Toml(#[from] toml::de::Error),
    #[error("address book has more than one segment for chain {0}")]
    DuplicateChainSegment(u64),
    #[error("{0} requires a [chain] section in the config file")]
    MissingChain(&'static str),
    #[error("{0} requires an [address_book] section in the config file")]
    MissingAddressBook(&'static str),
}

impl Config {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;
        Self::load(&config_str)
    }

    pub fn load(config_toml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(config_toml)?;

        if let Some(address_book) = &file.address_book {
            let mut seen = Vec::with_capacity(address_book.chains.len());
            for chain in &address_book.chains {
                if seen.contains(&chain.chain_id) {
                    return Err(ConfigError::DuplicateChainSegment(chain.chain_id));
                }
                seen.push(chain.chain_id);
            }
        }

        Ok(Self {
            log_level: file.log_level.unwrap_or(LogLevel::Info),
            import_policy: file.import_policy.unwrap_or_default(),
            chain: file.chain,
            address_book: file.address_book,
        })
    }

    /// Loads `env.config` when given, defaults otherwise.
    pub fn from_env(env: &Env) -> Result<Self, ConfigError> {
        env.config
            .as_deref()
            .map_or_else(|| Ok(Self::default()), Self::load_file)
    }

    pub fn require_chain(&self, command: &'static str) -> Result<&ChainConfig, ConfigError> {
        self.chain.as_ref().ok_or(ConfigError::MissingChain(command))
    }

    pub fn address_book(&self, command: &'static str) -> Result<AddressBook, ConfigError> {
        let config = self
            .address_book
            .as_ref()
            .ok_or(ConfigError::MissingAddressBook(command))?;

        Ok(AddressBook::new(
            config.base_url.clone(),
            config.chains.clone(),
        ))
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `log_level`. Logs go
/// to stderr so command output on stdout stays machine readable.
pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();
    let default_filter = format!("silo_wizard={level},silo_fixed_point={level}");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
