//! Resource coordinates and ownership metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GroupVersionResource identifies the collection a document belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionResource {
    /// API group, empty for the core group.
    #[serde(default)]
    pub group: String,
    pub version: String,
    /// Lowercase plural resource name, e.g. `secrets`.
    pub resource: String,
}

impl GroupVersionResource {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        GroupVersionResource {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    /// Coordinates in the core (empty) API group.
    pub fn core(version: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new("", version, resource)
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}.{}", self.resource, self.version)
        } else {
            write!(f, "{}.{}.{}", self.resource, self.version, self.group)
        }
    }
}

/// OwnerReference identifies the controller responsible for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

impl OwnerReference {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        OwnerReference {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
            uid: uid.into(),
            controller: None,
            block_owner_deletion: None,
        }
    }

    /// Returns the UID this reference asks to remove, if it is a removal marker.
    ///
    /// A UID with a trailing `-` requests removal of the owner with the
    /// trimmed UID instead of adding an owner.
    pub fn removal_target(&self) -> Option<&str> {
        self.uid.strip_suffix('-')
    }
}

/// Merges `additions` into `existing`, keyed by UID.
///
/// Entries are never dropped unless an addition is a removal marker for them.
/// An addition whose UID is already present replaces that entry in place.
/// Returns true if `existing` changed.
pub fn merge_owner_refs(existing: &mut Vec<OwnerReference>, additions: &[OwnerReference]) -> bool {
    let mut modified = false;
    for addition in additions {
        if let Some(target) = addition.removal_target() {
            let before = existing.len();
            existing.retain(|o| o.uid != target);
            modified |= existing.len() != before;
            continue;
        }

        match existing.iter_mut().find(|o| o.uid == addition.uid) {
            Some(current) if current == addition => {}
            Some(current) => {
                *current = addition.clone();
                modified = true;
            }
            None => {
                existing.push(addition.clone());
                modified = true;
            }
        }
    }
    modified
}
