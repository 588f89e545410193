//! # Work Apply
//!
//! Server-side apply of Kubernetes-style resources.
//!
//! Given a desired document, an owner and the coordinates of its collection,
//! the [`ServerSideApplier`] removes store-assigned fields, stamps the owner
//! reference and sends a single server-side apply request. Rejections caused
//! by fields owned by other managers come back as a typed
//! [`ServerSideApplyConflict`]; every other store failure is returned as is.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Paths naming fields inside a document
//! - [`object`] - Resource coordinates, owner references and untyped objects
//! - [`sanitize`] - Removal of creation timestamps, including from embedded documents
//! - [`client`] - The store boundary and an in-memory fake
//! - [`apply`] - The server-side applier and its conflict type
//! - [`config`] - Applier settings

pub mod apply;
pub mod client;
pub mod config;
pub mod fieldpath;
pub mod object;
pub mod sanitize;
pub mod value;

pub use apply::{
    ApplyError, ApplyOptions, ConflictCause, ServerSideApplier, ServerSideApplyConflict,
    UpdateStrategy,
};
pub use client::{AsConflict, ClientError, DynamicClient, PatchOptions};
pub use config::ApplierConfig;
pub use fieldpath::Path;
pub use object::{GroupVersionResource, OwnerReference, Unstructured};
pub use sanitize::remove_creation_timestamp;
pub use value::Value;
