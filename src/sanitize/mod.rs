//! Sanitize module - Strips store-assigned fields before a document is sent.

mod creation_timestamp;

#[cfg(test)]
mod sanitize_test;

pub use creation_timestamp::*;
