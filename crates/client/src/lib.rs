//! REST client for the storefront persistence endpoints.
//!
//! Implements [`storefront_core::backend::StorefrontBackend`] over HTTP so
//! the portal editor can load, save, publish and unpublish a tenant's
//! storefront profile.

pub mod api;
pub mod config;
