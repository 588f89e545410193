//! Dynamic store client interface.

use super::AsConflict;
use crate::object::{GroupVersionResource, Unstructured};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// PatchOptions accompany a server-side apply write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOptions {
    /// Identity the store records as owner of every field in the patch.
    pub field_manager: String,
    /// Take ownership of fields currently owned by other managers.
    pub force: bool,
}

/// DynamicClient is the boundary to a store of untyped resources.
///
/// Implementations must be usable from concurrent tasks. Every method
/// performs exactly one request; retrying is left to the caller.
#[async_trait]
pub trait DynamicClient: Send + Sync {
    /// Error type; must let the applier recognise field ownership conflicts.
    type Error: std::error::Error + AsConflict + Send + Sync + 'static;

    /// Reads an object. A missing object is `Ok(None)`.
    async fn get(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Unstructured>, Self::Error>;

    /// Server-side applies `patch`, a serialized document, creating the
    /// object if it does not exist. Returns the object as stored.
    async fn apply(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
        patch: &[u8],
        options: &PatchOptions,
    ) -> Result<Unstructured, Self::Error>;
}
