//! Readiness report printed by `storefront-check`.

use serde::Serialize;
use storefront_core::preview::PublicStorefront;
use storefront_core::publish_gate::PublishStatus;
use storefront_core::types::{TenantId, Timestamp};

use crate::editor::StorefrontEditor;

/// One unmet publish precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingRequirement {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub tenant_id: TenantId,
    pub status: PublishStatus,
    pub published_at: Option<Timestamp>,
    pub has_changes: bool,
    pub ready_to_publish: bool,
    pub missing: Vec<MissingRequirement>,
    pub preview: PublicStorefront,
}

impl CheckReport {
    pub async fn from_editor(editor: &StorefrontEditor) -> Self {
        let missing: Vec<MissingRequirement> = editor
            .readiness()
            .await
            .into_iter()
            .map(|r| MissingRequirement {
                field: r.field(),
                message: r.message(),
            })
            .collect();

        Self {
            tenant_id: editor.tenant().tenant_id(),
            status: editor.status().await,
            published_at: editor.published_at().await,
            has_changes: editor.has_changes().await,
            ready_to_publish: missing.is_empty(),
            missing,
            preview: editor.preview().await,
        }
    }
}
