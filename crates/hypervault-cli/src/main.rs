//! hypervault operator tool - Entry Point
//!
//! Inspects the network registry, converts amounts between human and Core
//! precision, and prints the close-all batch for the vault's open perp
//! positions. Nothing is submitted to Core.

use anyhow::Result;
use clap::{Parser, Subcommand};
use hypervault_cli::{commands, resolve_config_path, AppConfig, CONFIG_ENV_VAR};
use hypervault_registry::{validate_positions, InfoClient};
use rust_decimal::Decimal;
use tracing::info;

/// hypervault operator tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via HYPERVAULT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered tokens with their system addresses
    Tokens,
    /// Print the system address for a symbol or Core token id
    SystemAddress { token: String },
    /// Scale a human amount to an integer
    Scale { amount: Decimal, decimals: u8 },
    /// Convert an integer back to a human amount
    Unscale { raw: u64, decimals: u8 },
    /// Print the reduce-only orders that would close every open position
    ClosePlan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    hypervault_telemetry::init_logging()?;

    let config_path = resolve_config_path(args.config, std::env::var(CONFIG_ENV_VAR).ok());
    info!(config_path = %config_path, "Loading configuration");

    let config = AppConfig::from_file(&config_path)?;
    let (network, registry) = config.load_registry()?;

    match args.command {
        Command::Tokens => {
            println!("{}", serde_json::to_string_pretty(&commands::token_table(&registry))?);
        }
        Command::SystemAddress { token } => {
            let address = commands::system_address(&registry, &token)?;
            println!("{}", hypervault_registry::format_system_address(&address));
        }
        Command::Scale { amount, decimals } => {
            println!("{}", commands::scale_amount(amount, decimals)?);
        }
        Command::Unscale { raw, decimals } => {
            println!("{}", commands::unscale_amount(raw, decimals));
        }
        Command::ClosePlan => {
            let client = InfoClient::new(network.info_url.clone())?;
            let state = client.fetch_clearinghouse_state(config.vault_address).await?;
            let (positions, errors) = validate_positions(&state);
            commands::log_info_errors(&errors);
            let mids = client.fetch_all_mids().await?;

            let plan = commands::close_plan(
                &registry,
                config.owner,
                &positions,
                &mids,
                &config.close_policy,
            )?;
            info!(
                orders = plan.actions.len(),
                failures = plan.failures.len(),
                "Close plan built"
            );
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
