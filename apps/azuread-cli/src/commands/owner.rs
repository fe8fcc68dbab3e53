//! Group owner CLI commands

use azuread_directory::DirectoryClient;
use azuread_provider::prelude::*;
use clap::{Args, Subcommand};

use super::directory_from_env;
use crate::error::CliResult;

/// Group owner commands
#[derive(Args, Debug)]
pub struct OwnerArgs {
    #[command(subcommand)]
    pub command: OwnerCommands,
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommands {
    /// Add an owner to a group
    Add(AddArgs),

    /// Check that an owner belongs to a group
    Show(ShowArgs),

    /// Remove an owner from a group
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Group object ID
    pub group: String,

    /// Owner object ID (user or service principal)
    pub owner: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Owner ID as {groupObjectId}/{ownerObjectId}
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Owner ID as {groupObjectId}/{ownerObjectId}
    pub id: String,
}

/// Execute owner commands
pub async fn execute(args: OwnerArgs) -> CliResult<()> {
    let directory = directory_from_env()?;

    match args.command {
        OwnerCommands::Add(a) => execute_add(&directory, a).await,
        OwnerCommands::Show(a) => execute_show(&directory, a).await,
        OwnerCommands::Remove(a) => execute_remove(&directory, a).await,
    }
}

async fn execute_add<D: DirectoryClient + ?Sized>(directory: &D, args: AddArgs) -> CliResult<()> {
    let config = GroupOwnerConfig::new(args.group, args.owner);
    let state = GroupOwnerResource::new(directory).create(&config).await?;
    print_owner(&state, args.json)
}

async fn execute_show<D: DirectoryClient + ?Sized>(directory: &D, args: ShowArgs) -> CliResult<()> {
    let state = GroupOwnerResource::new(directory).import(&args.id).await?;
    print_owner(&state, args.json)
}

async fn execute_remove<D: DirectoryClient + ?Sized>(directory: &D, args: RemoveArgs) -> CliResult<()> {
    GroupOwnerResource::new(directory).delete(&args.id).await?;
    println!("Removed owner {}", args.id);
    Ok(())
}

fn print_owner(state: &GroupOwnerState, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        println!("ID:     {}", state.id);
        println!("Group:  {}", state.group_object_id);
        println!("Owner:  {}", state.owner_object_id);
    }
    Ok(())
}
