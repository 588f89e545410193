//! In-memory [`DynamicClient`] for tests.
//!
//! Objects live in a tracker keyed by coordinates. Every request is recorded
//! as an [`Action`] and offered to the reaction chain first; the first
//! reactor that handles it decides the outcome, otherwise the tracker does.

use super::{ClientError, DynamicClient, PatchOptions};
use crate::object::{merge_owner_refs, GroupVersionResource, Unstructured};
use crate::value::{Map, Value};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;

/// Timestamp the fake store assigns to objects it creates.
pub const FAKE_CREATION_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// Request kind recorded by the fake client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Apply,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Get => write!(f, "get"),
            Verb::Apply => write!(f, "apply"),
        }
    }
}

/// A request received by the fake client.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub verb: Verb,
    pub gvr: GroupVersionResource,
    pub namespace: String,
    pub name: String,
    /// Raw patch body, for apply.
    pub patch: Option<Vec<u8>>,
    pub options: Option<PatchOptions>,
}

impl Action {
    /// Decodes the patch body of an apply action.
    pub fn patch_object(&self) -> Option<Unstructured> {
        Unstructured::from_json_slice(self.patch.as_deref()?).ok()
    }
}

/// Reactor intercepts requests before they reach the tracker.
pub trait Reactor: Send + Sync {
    fn handles(&self, action: &Action) -> bool;

    /// Produces the response. For get, a not-found error is reported as a missing object.
    fn react(&self, action: &Action) -> Result<Unstructured, ClientError>;
}

type ReactionFn = dyn Fn(&Action) -> Result<Unstructured, ClientError> + Send + Sync;

/// Reactor matching a verb and a resource name, `*` matching any resource.
pub struct SimpleReactor {
    verb: Verb,
    resource: String,
    reaction: Box<ReactionFn>,
}

impl SimpleReactor {
    pub fn new<F>(verb: Verb, resource: impl Into<String>, reaction: F) -> Self
    where
        F: Fn(&Action) -> Result<Unstructured, ClientError> + Send + Sync + 'static,
    {
        SimpleReactor {
            verb,
            resource: resource.into(),
            reaction: Box::new(reaction),
        }
    }
}

impl Reactor for SimpleReactor {
    fn handles(&self, action: &Action) -> bool {
        action.verb == self.verb && (self.resource == "*" || self.resource == action.gvr.resource)
    }

    fn react(&self, action: &Action) -> Result<Unstructured, ClientError> {
        (self.reaction)(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    gvr: GroupVersionResource,
    namespace: String,
    name: String,
}

/// FakeDynamicClient serves requests from memory and records them.
#[derive(Default)]
pub struct FakeDynamicClient {
    objects: Mutex<BTreeMap<ObjectKey, Unstructured>>,
    actions: Mutex<Vec<Action>>,
    reactors: Vec<Box<dyn Reactor>>,
}

impl FakeDynamicClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the tracker with an existing object.
    pub fn with_object(self, gvr: &GroupVersionResource, obj: Unstructured) -> Self {
        self.add(gvr, obj);
        self
    }

    /// Puts a reactor in front of the reaction chain.
    pub fn prepend_reactor(mut self, reactor: impl Reactor + 'static) -> Self {
        self.reactors.insert(0, Box::new(reactor));
        self
    }

    pub fn add(&self, gvr: &GroupVersionResource, obj: Unstructured) {
        let key = ObjectKey {
            gvr: gvr.clone(),
            namespace: obj.namespace().to_string(),
            name: obj.name().to_string(),
        };
        self.objects.lock().insert(key, obj);
    }

    /// Returns the tracked object without recording an action.
    pub fn object(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Option<Unstructured> {
        self.objects.lock().get(&key(gvr, namespace, name)).cloned()
    }

    /// Returns the requests received so far.
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    /// Returns the verbs of the requests received so far.
    pub fn verbs(&self) -> Vec<Verb> {
        self.actions.lock().iter().map(|a| a.verb).collect()
    }

    fn record(&self, action: Action) -> Option<Result<Unstructured, ClientError>> {
        self.actions.lock().push(action.clone());
        self.reactors
            .iter()
            .find(|r| r.handles(&action))
            .map(|r| r.react(&action))
    }

    fn apply_to_tracker(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
        patch: &[u8],
    ) -> Result<Unstructured, ClientError> {
        let applied = Unstructured::from_json_slice(patch)
            .map_err(|e| ClientError::serialization(e.to_string()))?;
        if applied.name() != name || applied.namespace() != namespace {
            return Err(ClientError::invalid(
                format!(
                    "patch identifies {}/{}, request targets {}/{}",
                    applied.namespace(),
                    applied.name(),
                    namespace,
                    name
                ),
                Vec::new(),
            ));
        }

        let mut objects = self.objects.lock();
        let stored = match objects.get(&key(gvr, namespace, name)).cloned() {
            Some(live) => merge_live(live, applied)?,
            None => {
                let mut created = applied;
                created
                    .set_creation_timestamp(FAKE_CREATION_TIMESTAMP)
                    .map_err(|e| ClientError::invalid(e.to_string(), Vec::new()))?;
                created
            }
        };
        objects.insert(key(gvr, namespace, name), stored.clone());
        Ok(stored)
    }
}

fn key(gvr: &GroupVersionResource, namespace: &str, name: &str) -> ObjectKey {
    ObjectKey {
        gvr: gvr.clone(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

/// Merges an applied document into the live one, owner references additively.
fn merge_live(live: Unstructured, applied: Unstructured) -> Result<Unstructured, ClientError> {
    let invalid = |e: crate::object::ObjectError| ClientError::invalid(e.to_string(), Vec::new());

    let mut owners = live.owner_references().map_err(invalid)?;
    merge_owner_refs(&mut owners, &applied.owner_references().map_err(invalid)?);

    let mut merged = live.into_map();
    merge_maps(&mut merged, applied.into_map());

    let mut merged = Unstructured::from_map(merged);
    merged.set_owner_references(&owners).map_err(invalid)?;
    Ok(merged)
}

fn merge_maps(live: &mut Map, applied: Map) {
    for (k, v) in applied.fields {
        match v {
            Value::Map(incoming) => match live.get_mut(&k) {
                Some(Value::Map(existing)) => merge_maps(existing, incoming),
                _ => live.set(k, incoming),
            },
            v => live.set(k, v),
        }
    }
}

#[async_trait]
impl DynamicClient for FakeDynamicClient {
    type Error = ClientError;

    async fn get(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Unstructured>, ClientError> {
        let action = Action {
            verb: Verb::Get,
            gvr: gvr.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            patch: None,
            options: None,
        };
        match self.record(action) {
            Some(Ok(obj)) => Ok(Some(obj)),
            Some(Err(e)) if e.is_not_found() => Ok(None),
            Some(Err(e)) => Err(e),
            None => Ok(self.object(gvr, namespace, name)),
        }
    }

    async fn apply(
        &self,
        gvr: &GroupVersionResource,
        namespace: &str,
        name: &str,
        patch: &[u8],
        options: &PatchOptions,
    ) -> Result<Unstructured, ClientError> {
        let action = Action {
            verb: Verb::Apply,
            gvr: gvr.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            patch: Some(patch.to_vec()),
            options: Some(options.clone()),
        };
        match self.record(action) {
            Some(result) => result,
            None => self.apply_to_tracker(gvr, namespace, name, patch),
        }
    }
}
