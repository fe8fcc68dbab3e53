//! Composite identifiers
//!
//! Owner edges have no identity of their own in the directory, so they are
//! addressed as `{groupObjectId}/{ownerObjectId}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Separator between the two halves of a composite identifier.
pub const SEPARATOR: char = '/';

const EXPECTED_SEGMENTS: usize = 2;

/// Position of a segment inside a composite identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    First,
    Second,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::First => f.write_str("first"),
            Segment::Second => f.write_str("second"),
        }
    }
}

/// Error raised when a composite identifier is malformed.
#[derive(Debug, Error)]
pub enum IdError {
    /// Wrong number of `/`-separated segments.
    #[error(
        "ID should be in the format {{groupObjectId}}/{{ownerObjectId}} - found {found} segments, expected {expected} in {input:?}"
    )]
    SegmentCount {
        input: String,
        found: usize,
        expected: usize,
    },

    /// A segment is empty.
    #[error("{segment} segment of ID {input:?} is empty")]
    EmptySegment { input: String, segment: Segment },

    /// A segment is not a GUID.
    #[error("{segment} segment {value:?} of ID {input:?} is not a valid GUID: {source}")]
    InvalidGuid {
        input: String,
        segment: Segment,
        value: String,
        #[source]
        source: uuid::Error,
    },
}

/// Splits `input` into exactly two non-empty segments.
fn split_pair(input: &str) -> Result<(&str, &str), IdError> {
    let segments: Vec<&str> = input.split(SEPARATOR).collect();
    let [first, second] = segments.as_slice() else {
        return Err(IdError::SegmentCount {
            input: input.to_string(),
            found: segments.len(),
            expected: EXPECTED_SEGMENTS,
        });
    };

    for (segment, value) in [(Segment::First, first), (Segment::Second, second)] {
        if value.is_empty() {
            return Err(IdError::EmptySegment {
                input: input.to_string(),
                segment,
            });
        }
    }

    Ok((*first, *second))
}

fn parse_guid(input: &str, segment: Segment, value: &str) -> Result<Uuid, IdError> {
    Uuid::parse_str(value).map_err(|source| IdError::InvalidGuid {
        input: input.to_string(),
        segment,
        value: value.to_string(),
        source,
    })
}

/// Parses a `{guid}/{guid}` identifier into its two GUIDs.
pub fn parse_guid_pair(input: &str) -> Result<(Uuid, Uuid), IdError> {
    let (first, second) = split_pair(input)?;
    Ok((
        parse_guid(input, Segment::First, first)?,
        parse_guid(input, Segment::Second, second)?,
    ))
}

/// Identifier of a group-owner edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupOwnerId {
    group_id: String,
    owner_id: String,
}

impl GroupOwnerId {
    /// Create an identifier from its parts.
    pub fn new(group_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            owner_id: owner_id.into(),
        }
    }

    /// Parse `{groupObjectId}/{ownerObjectId}`.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let (group_id, owner_id) = split_pair(input)?;
        Ok(Self::new(group_id, owner_id))
    }

    /// Parse `{groupObjectId}/{ownerObjectId}`, requiring both halves to be GUIDs.
    pub fn parse_guids(input: &str) -> Result<Self, IdError> {
        let (group_id, owner_id) = parse_guid_pair(input)?;
        Ok(Self::new(group_id.to_string(), owner_id.to_string()))
    }

    /// The group half.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The owner half.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl fmt::Display for GroupOwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group_id, SEPARATOR, self.owner_id)
    }
}

impl FromStr for GroupOwnerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GroupOwnerId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GroupOwnerId> for String {
    fn from(id: GroupOwnerId) -> Self {
        id.to_string()
    }
}
