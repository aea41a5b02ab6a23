//! Storefront profile reconciliation engine.
//!
//! Pure domain logic for the breeder storefront editor: normalizing legacy
//! profile rows, merging draft and published snapshots, change detection,
//! visibility and removal constraints, and the publish gate. This crate has
//! no network or database dependencies; persistence is reached through the
//! [`backend::StorefrontBackend`] trait implemented elsewhere.

pub mod backend;
pub mod change;
pub mod edit;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod preview;
pub mod profile;
pub mod publish_gate;
pub mod roster;
pub mod tenant;
pub mod types;
pub mod visibility;
