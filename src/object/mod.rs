//! Object module - Resource identity, coordinates and ownership.

mod meta;
mod unstructured;

pub use meta::*;
pub use unstructured::*;
