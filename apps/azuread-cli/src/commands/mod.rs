//! CLI command implementations

pub mod group;
pub mod owner;

use azuread_directory::GraphDirectory;
use azuread_provider::prelude::{GroupConfig, GroupState};
use std::path::Path;

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Builds the Graph-backed directory from the environment.
pub(crate) fn directory_from_env() -> CliResult<GraphDirectory> {
    Config::from_env()?.directory()
}

/// Reads a group configuration file. `.json` files are parsed as JSON,
/// everything else as YAML.
pub(crate) fn load_group_config(path: &Path) -> CliResult<GroupConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    parse_group_config(path, &contents)
}

pub(crate) fn parse_group_config(path: &Path, contents: &str) -> CliResult<GroupConfig> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(contents)?)
    } else {
        Ok(serde_yaml::from_str(contents)?)
    }
}

pub(crate) fn print_group(state: &GroupState, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }

    println!("ID:     {}", state.id);
    println!("Name:   {}", state.name);
    if state.owners.is_empty() {
        println!("Owners: (none)");
    } else {
        println!("Owners:");
        for owner in &state.owners {
            println!("  {owner}");
        }
    }
    Ok(())
}
