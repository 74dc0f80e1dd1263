//! Boundary and resource types: the scanned inventory model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag map as stored on a resource.
///
/// Keys are unique under the provider's own case rules; nothing here
/// guarantees case-normalization. BTreeMap keeps iteration deterministic.
pub type TagMap = BTreeMap<String, String>;

/// A tenant/account-level scope within which resources are enumerated
/// and mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: String,
    pub name: String,
}

impl Boundary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A taggable resource inside one boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "TagMap::is_empty")]
    pub tags: TagMap,
}

impl Resource {
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// The two mutation primitives the inventory back-end offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagOperation {
    /// Remove one key/value pair.
    Delete,
    /// Insert or overwrite one key/value pair.
    Merge,
}

impl TagOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for TagOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_without_tags_reports_empty() {
        let resource = Resource {
            id: "r-1".to_string(),
            name: "vm-a".to_string(),
            resource_type: "virtualMachines".to_string(),
            group: String::new(),
            location: String::new(),
            tags: TagMap::new(),
        };
        assert!(!resource.has_tags());
    }

    #[test]
    fn tag_operation_round_trips_through_serde() {
        let json = serde_json::to_string(&TagOperation::Merge).expect("serialize");
        assert_eq!(json, "\"merge\"");
        let op: TagOperation = serde_json::from_str("\"delete\"").expect("deserialize");
        assert_eq!(op, TagOperation::Delete);
    }
}
