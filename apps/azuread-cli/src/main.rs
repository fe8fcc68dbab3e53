//! azuread CLI - Manage Azure AD security groups and their owners
//!
//! Reads a Microsoft Graph bearer token from `AZUREAD_ACCESS_TOKEN` and
//! drives the group and group-owner resources against the tenant.

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod logging;

use error::CliResult;

/// azuread CLI - Azure AD group management
#[derive(Parser)]
#[command(name = "azuread")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage groups
    Group(commands::group::GroupArgs),

    /// Manage individual group owners
    Owner(commands::owner::OwnerArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let log_config = config::LogConfig::from_env()?;
    logging::init_logging(&log_config)?;

    match cli.command {
        Commands::Group(args) => commands::group::execute(args).await,
        Commands::Owner(args) => commands::owner::execute(args).await,
    }
}
