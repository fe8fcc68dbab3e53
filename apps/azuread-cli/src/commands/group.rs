//! Group management CLI commands

use azuread_directory::DirectoryClient;
use azuread_provider::prelude::*;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

use super::{directory_from_env, load_group_config, print_group};
use crate::error::CliResult;

/// Group management commands
#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Create a security group
    Create(CreateArgs),

    /// Show a group and its owners
    Show(ShowArgs),

    /// Reconcile a group's owners
    Update(UpdateArgs),

    /// Delete a group
    Delete(DeleteArgs),

    /// Create or update a group from a YAML or JSON file
    Apply(ApplyArgs),

    /// Show what applying a file would change, without changing anything
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display name of the group
    #[arg(long)]
    pub name: String,

    /// Owner object ID (repeatable)
    #[arg(long = "owner", value_name = "OBJECT_ID")]
    pub owners: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Group object ID
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Group object ID
    pub id: String,

    /// Display name (must match the current name)
    #[arg(long)]
    pub name: String,

    /// Desired owner object ID (repeatable). Without any, owners are left as they are.
    #[arg(long = "owner", value_name = "OBJECT_ID")]
    pub owners: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Group object ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Group configuration file
    #[arg(long, short)]
    pub file: PathBuf,

    /// Object ID of the group the file describes. Omit to create it.
    #[arg(long)]
    pub id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Group configuration file
    #[arg(long, short)]
    pub file: PathBuf,

    /// Object ID of the group the file describes
    #[arg(long)]
    pub id: String,
}

/// Execute group commands
pub async fn execute(args: GroupArgs) -> CliResult<()> {
    let directory = directory_from_env()?;

    match args.command {
        GroupCommands::Create(a) => execute_create(&directory, a).await,
        GroupCommands::Show(a) => execute_show(&directory, a).await,
        GroupCommands::Update(a) => execute_update(&directory, a).await,
        GroupCommands::Delete(a) => execute_delete(&directory, a).await,
        GroupCommands::Apply(a) => execute_apply(&directory, a).await,
        GroupCommands::Plan(a) => execute_plan(&directory, a).await,
    }
}

fn config_from_flags(name: String, owners: Vec<String>) -> GroupConfig {
    let config = GroupConfig::new(name);
    if owners.is_empty() {
        config
    } else {
        config.with_owners(owners)
    }
}

async fn execute_create<D: DirectoryClient + ?Sized>(directory: &D, args: CreateArgs) -> CliResult<()> {
    let config = config_from_flags(args.name, args.owners);
    let state = GroupResource::new(directory).create(&config).await?;
    print_group(&state, args.json)
}

async fn execute_show<D: DirectoryClient + ?Sized>(directory: &D, args: ShowArgs) -> CliResult<()> {
    let state = GroupResource::new(directory).import(&args.id).await?;
    print_group(&state, args.json)
}

async fn execute_update<D: DirectoryClient + ?Sized>(directory: &D, args: UpdateArgs) -> CliResult<()> {
    let groups = GroupResource::new(directory);
    let prior = groups.import(&args.id).await?;
    let config = config_from_flags(args.name, args.owners);

    let state = groups.update(&args.id, &prior, &config).await?;
    print_group(&state, args.json)
}

async fn execute_delete<D: DirectoryClient + ?Sized>(directory: &D, args: DeleteArgs) -> CliResult<()> {
    GroupResource::new(directory).delete(&args.id).await?;
    println!("Deleted group {}", args.id);
    Ok(())
}

async fn execute_apply<D: DirectoryClient + ?Sized>(directory: &D, args: ApplyArgs) -> CliResult<()> {
    let config = load_group_config(&args.file)?;
    let state = apply(directory, args.id.as_deref(), &config).await?;
    print_group(&state, args.json)
}

/// Creates, updates or replaces the group so it matches `config`.
pub(crate) async fn apply<D: DirectoryClient + ?Sized>(
    directory: &D,
    id: Option<&str>,
    config: &GroupConfig,
) -> ProviderResult<GroupState> {
    let groups = GroupResource::new(directory);

    let Some(id) = id else {
        return groups.create(config).await;
    };

    let Some(prior) = groups.read(id).await? else {
        info!(group_id = %id, "Group is gone, creating it again");
        return groups.create(config).await;
    };

    match groups.plan(&prior, config)? {
        GroupPlan::NoOp => Ok(prior),
        GroupPlan::Update { .. } => groups.update(id, &prior, config).await,
        GroupPlan::Replace { from, to } => {
            info!(group_id = %id, %from, %to, "Name changed, replacing group");
            groups.delete(id).await?;
            groups.create(config).await
        }
    }
}

async fn execute_plan<D: DirectoryClient + ?Sized>(directory: &D, args: PlanArgs) -> CliResult<()> {
    let config = load_group_config(&args.file)?;
    let groups = GroupResource::new(directory);
    let prior = groups.import(&args.id).await?;

    println!("{}", groups.plan(&prior, &config)?);
    Ok(())
}
