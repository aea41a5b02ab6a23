//! Storefront editor session for the breeder portal.
//!
//! Wires the pure engine in `storefront-core` to a persistence collaborator:
//! load and merge, in-memory edits, then Save Draft / Publish / Unpublish
//! with per-action in-flight flags.

pub mod editor;
pub mod report;
