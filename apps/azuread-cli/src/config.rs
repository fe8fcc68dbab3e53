//! CLI configuration loaded from environment variables.
//!
//! Loading is fail-fast: a malformed value stops the CLI with a message
//! naming the variable, before any remote call is made.

use azuread_directory::{CloudEnvironment, DirectorySettings, GraphDirectory};
use secrecy::SecretString;
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CliResult;

pub const ACCESS_TOKEN_VAR: &str = "AZUREAD_ACCESS_TOKEN";
pub const CLOUD_VAR: &str = "AZUREAD_CLOUD";
pub const GRAPH_ENDPOINT_VAR: &str = "AZUREAD_GRAPH_ENDPOINT";
pub const API_VERSION_VAR: &str = "AZUREAD_API_VERSION";
pub const PAGE_SIZE_VAR: &str = "AZUREAD_PAGE_SIZE";
pub const TIMEOUT_VAR: &str = "AZUREAD_TIMEOUT_SECS";
pub const LOG_VAR: &str = "AZUREAD_LOG";
pub const LOG_FORMAT_VAR: &str = "AZUREAD_LOG_FORMAT";

/// Default log filter when neither `RUST_LOG` nor `AZUREAD_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

fn invalid(var: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.to_string(),
    }
}

/// Reads a variable, treating blank values as unset.
fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, var)
        .map(|v| v.parse::<T>().map_err(|e| invalid(var, e)))
        .transpose()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected json or pretty)")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            filter: non_empty(&lookup, LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            format: parse_var(&lookup, LOG_FORMAT_VAR)?.unwrap_or_default(),
        })
    }
}

/// Connection configuration for the Graph-backed directory.
#[derive(Debug)]
pub struct Config {
    pub settings: DirectorySettings,
    access_token: SecretString,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = non_empty(&lookup, ACCESS_TOKEN_VAR)
            .ok_or_else(|| ConfigError::MissingVar(ACCESS_TOKEN_VAR.to_string()))?;

        let cloud: CloudEnvironment = parse_var(&lookup, CLOUD_VAR)?.unwrap_or_default();
        let mut settings = DirectorySettings::for_cloud(cloud);

        if let Some(endpoint) = non_empty(&lookup, GRAPH_ENDPOINT_VAR) {
            settings = settings.with_graph_endpoint(endpoint);
        }
        if let Some(api_version) = non_empty(&lookup, API_VERSION_VAR) {
            settings.api_version = api_version;
        }
        if let Some(page_size) = parse_var(&lookup, PAGE_SIZE_VAR)? {
            settings = settings.with_page_size(page_size);
        }
        if let Some(timeout_secs) = parse_var(&lookup, TIMEOUT_VAR)? {
            settings.timeout_secs = timeout_secs;
        }

        settings
            .validate()
            .map_err(|e| invalid("directory settings", e))?;

        Ok(Self {
            settings,
            access_token: SecretString::from(access_token),
        })
    }

    /// Builds the Graph-backed directory client.
    pub fn directory(&self) -> CliResult<GraphDirectory> {
        Ok(GraphDirectory::new(&self.settings, self.access_token.clone())?)
    }
}
