//! Explicit tenant context handed to the editor and the persistence layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::TenantId;

/// The tenant whose storefront is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    /// Build a context for a persisted tenant. Ids are positive.
    pub fn new(tenant_id: TenantId) -> Result<Self, CoreError> {
        if tenant_id <= 0 {
            return Err(CoreError::Validation(format!(
                "Invalid tenant id {tenant_id}. Must be a positive integer"
            )));
        }
        Ok(Self { tenant_id })
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tenant {}", self.tenant_id)
    }
}
