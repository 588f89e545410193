//! Apply module - Server-side apply of desired documents to the store.
//!
//! Conflicts over field ownership are reported as
//! [`ServerSideApplyConflict`] so callers can tell them apart from every
//! other failure without looking at messages.

mod applier;
mod conflict;
mod options;


pub use applier::*;
pub use conflict::*;
pub use options::*;
