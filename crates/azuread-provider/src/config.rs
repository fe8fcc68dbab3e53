//! Typed resource configuration
//!
//! Configuration is deserialized as declared by the user and validated once,
//! at the boundary, into the types the resources work with.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{ProviderError, ProviderResult};

/// Minimum number of owners when `owners` is declared.
pub const MIN_OWNERS: usize = 1;

/// Maximum number of owners when `owners` is declared.
pub const MAX_OWNERS: usize = 100;

/// Declared configuration of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Display name. Cannot change after creation.
    pub name: String,

    /// Object IDs of the owners. `None` leaves owners unmanaged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,
}

impl GroupConfig {
    /// Create a configuration with unmanaged owners.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owners: None,
        }
    }

    /// Set the owners to manage.
    #[must_use]
    pub fn with_owners<I, S>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owners = Some(owners.into_iter().map(Into::into).collect());
        self
    }

    /// Validate the configuration, reporting every problem at once.
    pub fn validate(&self) -> ProviderResult<GroupSpec> {
        let mut problems = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            problems.push("name must not be empty".to_string());
        }

        let owners = self
            .owners
            .as_deref()
            .map(|owners| normalize_owners(owners, &mut problems));

        if !problems.is_empty() {
            return Err(ProviderError::Validation(problems));
        }

        Ok(GroupSpec {
            name: name.to_string(),
            owners,
        })
    }
}

fn normalize_owners(owners: &[String], problems: &mut Vec<String>) -> Vec<String> {
    if owners.len() < MIN_OWNERS {
        problems.push(format!("owners must contain at least {MIN_OWNERS} entry"));
    }
    if owners.len() > MAX_OWNERS {
        problems.push(format!(
            "owners must contain at most {MAX_OWNERS} entries, got {}",
            owners.len()
        ));
    }

    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(owners.len());
    for (index, owner) in owners.iter().enumerate() {
        match Uuid::parse_str(owner.trim()) {
            Ok(id) => {
                let id = id.to_string();
                if seen.insert(id.clone()) {
                    normalized.push(id);
                }
            }
            Err(e) => problems.push(format!("owners[{index}] {owner:?} is not a valid UUID: {e}")),
        }
    }
    normalized
}

/// Validated group configuration.
///
/// Owner IDs are lowercase hyphenated UUIDs, deduplicated, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub owners: Option<Vec<String>>,
}

/// Declared configuration of a single group-owner edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupOwnerConfig {
    pub group_object_id: String,
    pub owner_object_id: String,
}

impl GroupOwnerConfig {
    pub fn new(group_object_id: impl Into<String>, owner_object_id: impl Into<String>) -> Self {
        Self {
            group_object_id: group_object_id.into(),
            owner_object_id: owner_object_id.into(),
        }
    }

    /// Validate both IDs, returning them normalized.
    pub fn validate(&self) -> ProviderResult<GroupOwnerConfig> {
        let mut problems = Vec::new();
        let mut check = |field: &str, value: &str| match Uuid::parse_str(value.trim()) {
            Ok(id) => id.to_string(),
            Err(e) => {
                problems.push(format!("{field} {value:?} is not a valid UUID: {e}"));
                String::new()
            }
        };

        let group_object_id = check("group_object_id", &self.group_object_id);
        let owner_object_id = check("owner_object_id", &self.owner_object_id);

        if !problems.is_empty() {
            return Err(ProviderError::Validation(problems));
        }

        Ok(GroupOwnerConfig {
            group_object_id,
            owner_object_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER_A: &str = "6f1c0b9e-2f4e-4a53-9a8c-3e1f0d7c5b21";
    const OWNER_B: &str = "9a7e3d2c-1b0f-4e8d-a6c5-b4a3f2e1d0c9";

    #[test]
    fn test_valid_config() {
        let spec = GroupConfig::new("  Platform Admins ")
            .with_owners([OWNER_A, OWNER_B])
            .validate()
            .unwrap();

        assert_eq!(spec.name, "Platform Admins");
        assert_eq!(spec.owners, Some(vec![OWNER_A.to_string(), OWNER_B.to_string()]));
    }

    #[test]
    fn test_unmanaged_owners() {
        let spec = GroupConfig::new("Platform Admins").validate().unwrap();
        assert!(spec.owners.is_none());
    }

    #[test]
    fn test_owners_are_normalized_and_deduplicated() {
        let upper = OWNER_A.to_uppercase();
        let spec = GroupConfig::new("g")
            .with_owners([OWNER_B, upper.as_str(), OWNER_A, OWNER_B])
            .validate()
            .unwrap();

        assert_eq!(spec.owners, Some(vec![OWNER_B.to_string(), OWNER_A.to_string()]));
    }

    #[test]
    fn test_every_problem_is_reported() {
        let err = GroupConfig::new("   ")
            .with_owners(["not-a-uuid", OWNER_A, "also bad"])
            .validate()
            .unwrap_err();

        let ProviderError::Validation(problems) = err else {
            panic!("expected validation error");
        };
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0], "name must not be empty");
        assert!(problems[1].starts_with("owners[0] \"not-a-uuid\""));
        assert!(problems[2].starts_with("owners[2]"));
    }

    #[test]
    fn test_owner_count_bounds() {
        let empty = GroupConfig::new("g").with_owners(Vec::<String>::new()).validate();
        assert!(matches!(empty, Err(ProviderError::Validation(_))));

        let too_many: Vec<String> = (0..=MAX_OWNERS).map(|_| Uuid::new_v4().to_string()).collect();
        let err = GroupConfig::new("g").with_owners(too_many).validate().unwrap_err();
        assert!(err.to_string().contains("at most 100 entries, got 101"));

        let at_limit: Vec<String> = (0..MAX_OWNERS).map(|_| Uuid::new_v4().to_string()).collect();
        assert!(GroupConfig::new("g").with_owners(at_limit).validate().is_ok());
    }

    #[test]
    fn test_deserialize_yaml() {
        let config: GroupConfig = serde_yaml::from_str(&format!(
            "name: Platform Admins\nowners:\n  - {OWNER_A}\n"
        ))
        .unwrap();

        assert_eq!(config.name, "Platform Admins");
        assert_eq!(config.owners, Some(vec![OWNER_A.to_string()]));

        assert!(serde_yaml::from_str::<GroupConfig>("name: g\ncolour: blue\n").is_err());
    }

    #[test]
    fn test_group_owner_config_validation() {
        let valid = GroupOwnerConfig::new(OWNER_A.to_uppercase(), OWNER_B)
            .validate()
            .unwrap();
        assert_eq!(valid.group_object_id, OWNER_A);

        let err = GroupOwnerConfig::new("x", "y").validate().unwrap_err();
        let ProviderError::Validation(problems) = err else {
            panic!("expected validation error");
        };
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("group_object_id"));
        assert!(problems[1].starts_with("owner_object_id"));
    }
}
