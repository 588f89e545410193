//! Removal of store-assigned creation timestamps.

use crate::value::{self, Map, Value};

/// Field holding object metadata.
pub const METADATA_FIELD: &str = "metadata";

/// Volatile metadata field assigned by the store on creation.
pub const CREATION_TIMESTAMP_FIELD: &str = "creationTimestamp";

/// Field whose sequence items are embedded child documents.
pub const EMBEDDED_DOCUMENTS_FIELD: &str = "manifests";

/// Removes `metadata.creationTimestamp` from `obj` and from every document nested in it.
///
/// Nested maps carrying their own `metadata` (such as a pod template) are
/// cleaned the same way. Items of a `manifests` sequence are embedded
/// documents: map items are cleaned in place, string items are decoded as
/// JSON, cleaned and written back re-encoded. A string item that does not
/// decode to a map is left untouched, as is one with nothing to remove.
///
/// Returns true if any field was removed.
pub fn remove_creation_timestamp(obj: &mut Map) -> bool {
    let mut removed = false;

    if let Some(metadata) = obj.get_mut(METADATA_FIELD).and_then(Value::as_map_mut) {
        if metadata.delete(CREATION_TIMESTAMP_FIELD).is_some() {
            tracing::trace!("removed metadata.creationTimestamp");
            removed = true;
        }
    }

    for (key, child) in obj.fields.iter_mut() {
        removed |= match child {
            Value::List(items) if key == EMBEDDED_DOCUMENTS_FIELD => items
                .iter_mut()
                .fold(false, |acc, item| sanitize_embedded(item) | acc),
            other => walk(other),
        };
    }

    removed
}

fn walk(value: &mut Value) -> bool {
    match value {
        Value::Map(m) => remove_creation_timestamp(m),
        Value::List(items) => items.iter_mut().fold(false, |acc, item| walk(item) | acc),
        _ => false,
    }
}

fn sanitize_embedded(item: &mut Value) -> bool {
    match item {
        Value::Map(m) => remove_creation_timestamp(m),
        Value::String(raw) => {
            let Ok(Value::Map(mut child)) = value::from_json(raw) else {
                tracing::trace!("leaving undecodable embedded document as is");
                return false;
            };
            if !remove_creation_timestamp(&mut child) {
                return false;
            }
            match value::to_json(&Value::Map(child)) {
                Ok(encoded) => {
                    *raw = encoded;
                    true
                }
                Err(err) => {
                    tracing::trace!(error = %err, "leaving embedded document as is");
                    false
                }
            }
        }
        _ => false,
    }
}
