//! Untyped resource documents.

use super::OwnerReference;
use crate::value::{self, Map, PathError, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ObjectError is returned when a document does not have the shape of a resource.
#[derive(Debug, Error)]
pub enum ObjectError {
    #[error("document is not a map, got {0}")]
    NotAMap(&'static str),

    #[error("metadata.name is required")]
    MissingName,

    #[error("owner reference has no uid")]
    MissingOwnerUid,

    #[error("invalid field: {0}")]
    Path(#[from] PathError),

    #[error("invalid ownerReferences: {0}")]
    OwnerReferences(#[source] serde_json::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Unstructured is a resource document of any kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unstructured {
    object: Map,
}

impl Unstructured {
    /// Builds a minimal document with type and identity fields set.
    pub fn new(api_version: &str, kind: &str, namespace: &str, name: &str) -> Self {
        let mut metadata = Map::new();
        metadata.set("name", name);
        if !namespace.is_empty() {
            metadata.set("namespace", namespace);
        }

        let mut object = Map::new();
        object.set("apiVersion", api_version);
        object.set("kind", kind);
        object.set("metadata", metadata);
        Unstructured { object }
    }

    pub fn from_map(object: Map) -> Self {
        Unstructured { object }
    }

    pub fn from_value(value: Value) -> Result<Self, ObjectError> {
        match value {
            Value::Map(object) => Ok(Unstructured { object }),
            other => Err(ObjectError::NotAMap(other.type_name())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ObjectError> {
        Self::from_value(value::from_json(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, ObjectError> {
        Self::from_value(value::from_json_slice(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ObjectError> {
        Self::from_value(value::from_yaml(yaml)?)
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.object)
    }

    pub fn object(&self) -> &Map {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut Map {
        &mut self.object
    }

    pub fn into_map(self) -> Map {
        self.object
    }

    pub fn api_version(&self) -> &str {
        self.object.nested_str(&["apiVersion"]).unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.object.nested_str(&["kind"]).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.object.nested_str(&["metadata", "name"]).unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.object
            .nested_str(&["metadata", "namespace"])
            .unwrap_or_default()
    }

    pub fn creation_timestamp(&self) -> Option<&Value> {
        self.object.nested_field(&["metadata", "creationTimestamp"])
    }

    pub fn set_creation_timestamp(&mut self, timestamp: &str) -> Result<(), ObjectError> {
        self.object
            .set_nested_field(&["metadata", "creationTimestamp"], timestamp.into())?;
        Ok(())
    }

    /// Decodes `metadata.ownerReferences`; an absent or null list is empty.
    pub fn owner_references(&self) -> Result<Vec<OwnerReference>, ObjectError> {
        match self.object.nested_field(&["metadata", "ownerReferences"]) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(refs) => {
                let json: serde_json::Value = refs.clone().into();
                serde_json::from_value(json).map_err(ObjectError::OwnerReferences)
            }
        }
    }

    /// Replaces `metadata.ownerReferences`; an empty list removes the field.
    pub fn set_owner_references(&mut self, refs: &[OwnerReference]) -> Result<(), ObjectError> {
        if refs.is_empty() {
            self.object
                .remove_nested_field(&["metadata", "ownerReferences"]);
            return Ok(());
        }
        let json = serde_json::to_value(refs).map_err(ObjectError::OwnerReferences)?;
        self.object
            .set_nested_field(&["metadata", "ownerReferences"], Value::from(json))?;
        Ok(())
    }
}

impl From<Unstructured> for Value {
    fn from(u: Unstructured) -> Self {
        Value::Map(u.object)
    }
}
