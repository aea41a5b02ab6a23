//! Persistence collaborator used by the storefront editor.
//!
//! The engine never talks to the network itself. Implementations of
//! [`StorefrontBackend`] live outside this crate (the REST client in
//! `storefront-client`, in-memory fakes in tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::StorefrontProfile;
use crate::roster::BreedingProgramRefs;
use crate::tenant::TenantContext;
use crate::types::Timestamp;

/// Both stored snapshots plus the live-publication timestamp.
///
/// Snapshots stay raw JSON: they may predate the current schema and are
/// normalized by the merger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub published: Option<Value>,
    #[serde(default)]
    pub draft: Option<Value>,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
}

/// Failures reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The server processed the request and refused it with a reason.
    #[error("{0}")]
    Rejected(String),

    /// The request did not produce a usable server answer.
    #[error("Request failed: {0}")]
    Transport(String),
}

impl BackendError {
    /// The server's own reason, when it gave one.
    pub fn server_reason(&self) -> Option<&str> {
        match self {
            Self::Rejected(reason) if !reason.trim().is_empty() => Some(reason),
            _ => None,
        }
    }

    /// Operator-facing message: the server's reason verbatim, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_reason().unwrap_or(fallback).to_string()
    }
}

#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    async fn fetch_profile(&self, tenant: &TenantContext) -> Result<ProfileSnapshot, BackendError>;

    async fn save_draft(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), BackendError>;

    /// The server re-validates the publish preconditions.
    async fn publish(
        &self,
        tenant: &TenantContext,
        profile: &StorefrontProfile,
    ) -> Result<(), BackendError>;

    async fn unpublish(&self, tenant: &TenantContext) -> Result<(), BackendError>;

    async fn fetch_breeding_program_references(
        &self,
        tenant: &TenantContext,
    ) -> Result<BreedingProgramRefs, BackendError>;
}
