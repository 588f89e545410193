//! Field path module - Addresses fields inside resource documents.
//!
//! Conflict causes reported by the store name the contended field with a
//! path such as `.metadata.annotations`.

mod path;

pub use path::*;
