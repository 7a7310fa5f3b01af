//! Command-line interface for wizard config conversion and deployment checks.

use silo_wizard::cli;
use silo_wizard::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, command) = cli::CliEnv::parse_and_convert()?;
    setup_tracing(&config.log_level);

    cli::run_command(config, command).await?;
    Ok(())
}
