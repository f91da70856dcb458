//! Target identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConnectionError;

/// Row id of a persisted cluster record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u32);

impl ClusterId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ClusterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ClusterId {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ConnectionError::InvalidTargetId(s.to_string()))
    }
}

/// Which cluster a request is aimed at.
///
/// `Default` is the connection built at process start; it never touches
/// the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    Default,
    Cluster(ClusterId),
}

impl TargetId {
    /// Interpret the raw `cluster_id` query value.
    ///
    /// Absent or empty means the default target.
    pub fn from_query(raw: Option<&str>) -> Result<Self, ConnectionError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Default),
            Some(value) => value.parse::<ClusterId>().map(Self::Cluster),
        }
    }

    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            Self::Default => None,
            Self::Cluster(id) => Some(*id),
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Cluster(id) => write!(f, "cluster:{}", id),
        }
    }
}
