//! Client module - Boundary to the store holding live resources.
//!
//! The applier only needs a server-side apply write and a way to recognise
//! field ownership conflicts in the errors the store returns.

mod client;
mod error;
pub mod fake;

pub use client::*;
pub use error::*;
