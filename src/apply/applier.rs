//! Server-side applier.

use super::{ApplyOptions, ServerSideApplyConflict, UpdateStrategy, DEFAULT_FIELD_MANAGER};
use crate::client::{AsConflict, DynamicClient, PatchOptions};
use crate::config::ApplierConfig;
use crate::object::{
    merge_owner_refs, GroupVersionResource, ObjectError, OwnerReference, Unstructured,
};
use crate::sanitize::remove_creation_timestamp;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// ApplyError represents a failed apply.
///
/// A field ownership conflict is always [`ApplyError::Conflict`]; anything
/// else the store reports is passed through untouched as [`ApplyError::Store`].
#[derive(Debug, Error)]
pub enum ApplyError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Conflict(#[from] ServerSideApplyConflict),

    #[error("update strategy {0} is not supported by the server-side applier")]
    UnsupportedStrategy(&'static str),

    #[error("invalid object: {0}")]
    InvalidObject(#[from] ObjectError),

    #[error("apply cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(E),
}

impl<E: std::error::Error + 'static> ApplyError<E> {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApplyError::Conflict(_))
    }

    pub fn as_conflict(&self) -> Option<&ServerSideApplyConflict> {
        match self {
            ApplyError::Conflict(c) => Some(c),
            _ => None,
        }
    }

    pub fn store_error(&self) -> Option<&E> {
        match self {
            ApplyError::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// Classifies a store error: field ownership conflicts become [`ApplyError::Conflict`].
fn classify<E>(err: E) -> ApplyError<E>
where
    E: std::error::Error + AsConflict + 'static,
{
    match err.as_conflict() {
        Some(causes) if !causes.is_empty() => ApplyError::Conflict(
            ServerSideApplyConflict::from_status_causes(err.to_string(), &causes),
        ),
        _ => ApplyError::Store(err),
    }
}

/// Builds the body of an apply request for `required`.
///
/// Works on a copy: creation timestamps are removed and `owner` is merged
/// into the owner references. An owner without a UID is rejected with
/// [`ObjectError::MissingOwnerUid`].
pub fn prepare_patch(
    required: &Unstructured,
    owner: &OwnerReference,
) -> Result<Vec<u8>, ObjectError> {
    if owner.uid.is_empty() {
        return Err(ObjectError::MissingOwnerUid);
    }

    let mut obj = required.clone();
    remove_creation_timestamp(obj.object_mut());

    let mut owners = obj.owner_references()?;
    if merge_owner_refs(&mut owners, std::slice::from_ref(owner)) {
        obj.set_owner_references(&owners)?;
    }

    Ok(obj.to_json_bytes()?)
}

/// ServerSideApplier converges stored objects with server-side apply.
///
/// It holds no state besides the client and its field manager, so one
/// applier can serve concurrent calls. Each call issues exactly one write.
pub struct ServerSideApplier<C> {
    client: C,
    field_manager: String,
}

impl<C: DynamicClient> ServerSideApplier<C> {
    /// Creates an applier using [`DEFAULT_FIELD_MANAGER`].
    pub fn new(client: C) -> Self {
        Self::with_field_manager(client, DEFAULT_FIELD_MANAGER)
    }

    pub fn with_field_manager(client: C, field_manager: impl Into<String>) -> Self {
        ServerSideApplier {
            client,
            field_manager: field_manager.into(),
        }
    }

    pub fn from_config(client: C, config: &ApplierConfig) -> Self {
        Self::with_field_manager(client, config.field_manager.clone())
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn field_manager(&self) -> &str {
        &self.field_manager
    }

    /// Applies `required` to the collection `gvr` on behalf of `owner`.
    ///
    /// Returns the object as stored. `required` is not modified. A document
    /// without a name or an owner without a UID fails with
    /// [`ApplyError::InvalidObject`] before the store is contacted.
    pub async fn apply(
        &self,
        gvr: &GroupVersionResource,
        required: &Unstructured,
        owner: &OwnerReference,
        options: &ApplyOptions,
    ) -> Result<Unstructured, ApplyError<C::Error>> {
        let config = match &options.update_strategy {
            UpdateStrategy::ServerSideApply(config) => config,
            other => return Err(ApplyError::UnsupportedStrategy(other.name())),
        };
        if required.name().is_empty() {
            return Err(ApplyError::InvalidObject(ObjectError::MissingName));
        }

        let patch = prepare_patch(required, owner)?;
        let patch_options = PatchOptions {
            field_manager: config
                .field_manager
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(&self.field_manager)
                .to_string(),
            force: config.force,
        };

        tracing::debug!(
            resource = %gvr,
            namespace = required.namespace(),
            name = required.name(),
            field_manager = %patch_options.field_manager,
            force = patch_options.force,
            "server-side applying"
        );

        self.client
            .apply(gvr, required.namespace(), required.name(), &patch, &patch_options)
            .await
            .map_err(|err| {
                let err = classify(err);
                if let ApplyError::Conflict(conflict) = &err {
                    tracing::debug!(
                        resource = %gvr,
                        namespace = required.namespace(),
                        name = required.name(),
                        causes = conflict.len(),
                        "server-side apply conflict"
                    );
                }
                err
            })
    }

    /// Like [`ServerSideApplier::apply`], abandoning the write once `cancel` fires.
    ///
    /// A token cancelled before the call returns [`ApplyError::Cancelled`]
    /// without contacting the store.
    pub async fn apply_with_cancellation(
        &self,
        gvr: &GroupVersionResource,
        required: &Unstructured,
        owner: &OwnerReference,
        options: &ApplyOptions,
        cancel: &CancellationToken,
    ) -> Result<Unstructured, ApplyError<C::Error>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApplyError::Cancelled),
            result = self.apply(gvr, required, owner, options) => result,
        }
    }
}
