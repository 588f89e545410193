//! Value module - In-memory representation of resource documents.
//!
//! Documents are untyped trees of maps, lists and scalars, addressed by
//! field paths such as `["metadata", "creationTimestamp"]`.

mod value;

pub use value::*;
