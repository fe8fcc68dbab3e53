//! Directory endpoint settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{DirectoryError, DirectoryResult};

/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v1.0";

/// Default page size when enumerating owners.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page size Graph accepts for `$top`.
pub const MAX_PAGE_SIZE: u32 = 999;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Azure cloud the tenant lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudEnvironment {
    /// Azure public cloud.
    #[default]
    Global,
    /// Azure US Government.
    UsGovernment,
    /// Azure China (21Vianet).
    China,
    /// Azure Germany.
    Germany,
}

impl CloudEnvironment {
    /// Returns the Microsoft Graph endpoint for this cloud.
    #[must_use]
    pub fn graph_endpoint(&self) -> &'static str {
        match self {
            Self::Global => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
        }
    }
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Global => "global",
            Self::UsGovernment => "usgovernment",
            Self::China => "china",
            Self::Germany => "germany",
        };
        f.write_str(name)
    }
}

impl FromStr for CloudEnvironment {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "global" | "public" | "commercial" => Ok(Self::Global),
            "usgovernment" | "us_government" | "usgov" => Ok(Self::UsGovernment),
            "china" => Ok(Self::China),
            "germany" => Ok(Self::Germany),
            other => Err(DirectoryError::Config(format!(
                "unknown cloud environment '{other}' (expected global, usgovernment, china or germany)"
            ))),
        }
    }
}

/// Settings for reaching the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// Cloud the tenant lives in.
    #[serde(default)]
    pub cloud: CloudEnvironment,

    /// Overrides the cloud's Graph endpoint (proxies, test servers).
    #[serde(default)]
    pub graph_endpoint: Option<String>,

    /// Graph API version segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// `$top` used when listing owners.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            cloud: CloudEnvironment::default(),
            graph_endpoint: None,
            api_version: default_api_version(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DirectorySettings {
    /// Settings for the given cloud with defaults for everything else.
    #[must_use]
    pub fn for_cloud(cloud: CloudEnvironment) -> Self {
        Self {
            cloud,
            ..Self::default()
        }
    }

    /// Points the client at an explicit endpoint instead of the cloud default.
    #[must_use]
    pub fn with_graph_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graph_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the owner listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns `{endpoint}/{api_version}` without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let endpoint = self
            .graph_endpoint
            .as_deref()
            .unwrap_or_else(|| self.cloud.graph_endpoint())
            .trim_end_matches('/');
        format!("{}/{}", endpoint, self.api_version.trim_matches('/'))
    }

    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Config` describing the first invalid field.
    pub fn validate(&self) -> DirectoryResult<()> {
        if let Some(endpoint) = &self.graph_endpoint {
            url::Url::parse(endpoint).map_err(|e| {
                DirectoryError::Config(format!("invalid graph endpoint '{endpoint}': {e}"))
            })?;
        }
        if self.api_version.trim_matches('/').is_empty() {
            return Err(DirectoryError::Config("api version must not be empty".into()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(DirectoryError::Config(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.timeout_secs == 0 {
            return Err(DirectoryError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}
