use std::io::Write;
use std::path::PathBuf;

use alloy::primitives::{Address, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use silo_fixed_point::{
    E18Style, ScaledPercentage, display_to_scaled, format_big_int_to_e18,
    format_wizard_big_int_to_e18, wizard_basis_points_to_scaled,
};
use tracing::info;

use crate::address_book::AddressBook;
use crate::config::{Config, Env};
use crate::deployment::fetch_deployment;
use crate::verify::is_silo_registered;
use crate::versions::VersionResolver;
use crate::wizard::{ImportPolicy, WizardSnapshot, export_config, import_config};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rebuild a wizard snapshot from an exported JSON configuration
    Import {
        /// Exported configuration file
        #[arg(long = "file")]
        file: PathBuf,
        /// Reject unknown hook filenames and empty oracle names
        #[arg(long)]
        strict: bool,
    },
    /// Generate the exported JSON configuration for a wizard snapshot
    Export {
        /// Wizard snapshot file
        #[arg(long = "file")]
        file: PathBuf,
    },
    /// Convert a display percentage (e.g. 4.001) to wizard scale
    ToScaled { percentage: String },
    /// Convert a basis-point fee input to an 18-decimal on-chain amount
    BasisPoints { value: Decimal },
    /// Render an 18-decimal integer in e18 notation
    FormatE18 {
        value: String,
        /// Strip trailing fractional zeros
        #[arg(long)]
        compact: bool,
        /// Treat the value as a signed wizard-scale integer
        #[arg(long)]
        wizard: bool,
    },
    /// Decode the deployment results of a deployment transaction
    Decode {
        /// Transaction hash (0x prefixed, 64 hex characters)
        #[arg(long = "tx-hash")]
        tx_hash: B256,
    },
    /// Check that a silo was deployed by the configured factory
    IsSilo {
        #[arg(long)]
        silo: Address,
    },
    /// Look up implementation versions through the versions lens
    Versions {
        #[arg(long = "address", required = true)]
        addresses: Vec<Address>,
    },
    /// Resolve a name through the chain's address book
    AddressBook {
        key: String,
        /// Defaults to the configured chain
        #[arg(long = "chain-id")]
        chain_id: Option<u64>,
    },
    /// Check whether an address appears anywhere in the chain's address book
    InAddressBook {
        address: Address,
        /// Defaults to the configured chain
        #[arg(long = "chain-id")]
        chain_id: Option<u64>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "silo-wizard")]
#[command(about = "Normalization, verification and config tooling for Silo market deployments")]
#[command(version)]
pub struct CliEnv {
    #[clap(flatten)]
    env: Env,
    #[command(subcommand)]
    pub command: Commands,
}

impl CliEnv {
    /// Parse CLI arguments and load the config file they point to
    pub fn parse_and_convert() -> anyhow::Result<(Config, Commands)> {
        let cli_env = Self::parse();
        let config = Config::from_env(&cli_env.env)?;
        Ok((config, cli_env.command))
    }
}

pub async fn run_command(config: Config, command: Commands) -> anyhow::Result<()> {
    run_command_with_writers(config, command, &mut std::io::stdout()).await
}

async fn run_command_with_writers<W: Write>(
    config: Config,
    command: Commands,
    stdout: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Import { file, strict } => {
            let policy = if strict {
                ImportPolicy::Strict
            } else {
                config.import_policy
            };
            info!(file = %file.display(), ?policy, "Importing configuration");
            let text = std::fs::read_to_string(&file)?;
            import_with_writers(&text, policy, stdout)?;
        }
        Commands::Export { file } => {
            info!(file = %file.display(), "Exporting configuration");
            let text = std::fs::read_to_string(&file)?;
            export_with_writers(&text, stdout)?;
        }
        Commands::ToScaled { percentage } => {
            let scaled = display_to_scaled(&percentage)?;
            writeln!(stdout, "{scaled}")?;
        }
        Commands::BasisPoints { value } => {
            let amount = wizard_basis_points_to_scaled(value)?;
            writeln!(stdout, "{amount}")?;
        }
        Commands::FormatE18 {
            value,
            compact,
            wizard,
        } => {
            let style = if compact {
                E18Style::Compact
            } else {
                E18Style::Full
            };
            let formatted = if wizard {
                format_wizard_big_int_to_e18(value.trim().parse::<ScaledPercentage>()?, style)
            } else {
                format_big_int_to_e18(U256::from_str_radix(value.trim(), 10)?, style)
            };
            writeln!(stdout, "{formatted}")?;
        }
        Commands::Decode { tx_hash } => {
            let chain = config.require_chain("decode")?;
            let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
            decode_with_provider(tx_hash, &provider, stdout).await?;
        }
        Commands::IsSilo { silo } => {
            let chain = config.require_chain("is-silo")?;
            let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
            is_silo_with_provider(chain.silo_factory, silo, &provider, stdout).await?;
        }
        Commands::Versions { addresses } => {
            let chain = config.require_chain("versions")?;
            let provider = ProviderBuilder::new().connect_http(chain.rpc_url.clone());
            let resolver = VersionResolver::new(provider);
            versions_with_resolver(
                &resolver,
                chain.chain_id,
                chain.versions_lens,
                &addresses,
                stdout,
            )
            .await?;
        }
        Commands::AddressBook { key, chain_id } => {
            let chain_id = match chain_id {
                Some(chain_id) => chain_id,
                None => config.require_chain("address-book")?.chain_id,
            };
            let book = config.address_book("address-book")?;
            address_book_with_writers(&book, chain_id, &key, stdout).await?;
        }
        Commands::InAddressBook { address, chain_id } => {
            let chain_id = match chain_id {
                Some(chain_id) => chain_id,
                None => config.require_chain("in-address-book")?.chain_id,
            };
            let book = config.address_book("in-address-book")?;
            in_address_book_with_writers(&book, chain_id, address, stdout).await?;
        }
    }

    Ok(())
}

fn import_with_writers<W: Write>(
    text: &str,
    policy: ImportPolicy,
    stdout: &mut W,
) -> anyhow::Result<()> {
    let snapshot = import_config(text, policy)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&snapshot)?)?;
    Ok(())
}

fn export_with_writers<W: Write>(text: &str, stdout: &mut W) -> anyhow::Result<()> {
    let snapshot: WizardSnapshot = serde_json::from_str(text)?;
    let exported = export_config(&snapshot)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&exported)?)?;
    Ok(())
}

async fn decode_with_provider<W: Write, P: Provider>(
    tx_hash: B256,
    provider: P,
    stdout: &mut W,
) -> anyhow::Result<()> {
    info!(%tx_hash, "Decoding deployment");
    let record = fetch_deployment(provider, tx_hash).await?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

async fn is_silo_with_provider<W: Write, P: Provider>(
    factory: Address,
    silo: Address,
    provider: P,
    stdout: &mut W,
) -> anyhow::Result<()> {
    if is_silo_registered(provider, factory, silo).await {
        writeln!(stdout, "✅ {silo} is registered with factory {factory}")?;
    } else {
        writeln!(stdout, "❌ {silo} is not registered with factory {factory}")?;
    }
    Ok(())
}

async fn versions_with_resolver<W: Write, P: Provider>(
    resolver: &VersionResolver<P>,
    chain_id: u64,
    lens: Address,
    addresses: &[Address],
    stdout: &mut W,
) -> anyhow::Result<()> {
    let versions = resolver.resolve(chain_id, lens, addresses).await;

    for address in addresses {
        match versions.get(address) {
            Some(version) if version.is_empty() => writeln!(stdout, "{address}: (no version)")?,
            Some(version) => writeln!(stdout, "{address}: {version}")?,
            None => writeln!(stdout, "{address}: ❌ lookup failed")?,
        }
    }
    Ok(())
}

async fn address_book_with_writers<W: Write>(
    book: &AddressBook,
    chain_id: u64,
    key: &str,
    stdout: &mut W,
) -> anyhow::Result<()> {
    match book.resolve(chain_id, key).await {
        Some(address) => writeln!(stdout, "{address}")?,
        None => writeln!(stdout, "❌ {key} not found in the chain {chain_id} address book")?,
    }
    Ok(())
}

async fn in_address_book_with_writers<W: Write>(
    book: &AddressBook,
    chain_id: u64,
    address: Address,
    stdout: &mut W,
) -> anyhow::Result<()> {
    if book.contains(chain_id, address).await {
        writeln!(stdout, "✅ {address} is in the chain {chain_id} address book")?;
    } else {
        writeln!(stdout, "❌ {address} is not in the chain {chain_id} address book")?;
    }
    Ok(())
}
