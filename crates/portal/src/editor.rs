//! The storefront editor session.
//!
//! One [`StorefrontEditor`] per open editor. It owns the live form state,
//! the change tracker baseline and the publication timestamp behind an
//! interior `RwLock`, and is meant to be shared through `Arc` by whatever
//! drives it. Persistence calls never hold the lock across the network
//! round trip: the form is snapshotted, the lock released, and the result
//! applied afterwards unless the session was detached in the meantime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_core::backend::{BackendError, StorefrontBackend};
use storefront_core::change::ChangeTracker;
use storefront_core::edit::{apply_edit, EditAction, EditContext, EditRejected};
use storefront_core::error::CoreError;
use storefront_core::merge::merge_snapshots;
use storefront_core::preview::{public_view, PublicStorefront};
use storefront_core::profile::{LocationMode, StorefrontProfile};
use storefront_core::publish_gate::{
    evaluate, publish_requirements, published_at_after, GateAction, GateBlock, PersistCall,
    PublishRequirement, PublishStatus,
};
use storefront_core::roster::{can_remove_breed, BreedingProgramRefs, RemovalCheck};
use storefront_core::tenant::TenantContext;
use storefront_core::types::Timestamp;
use storefront_core::visibility;
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The initial profile fetch failed.
    #[error("Failed to load storefront: {0}")]
    Load(BackendError),

    /// A conflicting persistence call is already in flight.
    #[error("{action} is already in progress")]
    Busy { action: &'static str },

    /// A local precondition blocked the action before any network call.
    #[error(transparent)]
    Blocked(#[from] GateBlock),

    #[error(transparent)]
    Rejected(#[from] EditRejected),

    /// The collaborator failed. `message` is what the operator sees.
    #[error("{message}")]
    Persistence {
        action: &'static str,
        message: String,
    },

    /// The session was detached while the call was in flight; its result
    /// was discarded.
    #[error("Editor was closed before {action} completed")]
    Detached { action: &'static str },

    #[error(transparent)]
    Internal(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// In-flight flags
// ---------------------------------------------------------------------------

/// Holds an action's in-flight flags for the duration of a persistence call.
///
/// `lock` excludes concurrent calls; `indicator` reports which action holds
/// it. Both are cleared on drop.
struct InFlight<'a> {
    lock: &'a AtomicBool,
    indicator: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(lock: &'a AtomicBool, indicator: &'a AtomicBool) -> Option<Self> {
        lock.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        indicator.store(true, Ordering::Release);
        Some(Self { lock, indicator })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.indicator.store(false, Ordering::Release);
        self.lock.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

struct EditorState {
    form: StorefrontProfile,
    tracker: ChangeTracker,
    published_at: Option<Timestamp>,
    refs: BreedingProgramRefs,
}

/// Editing session for one tenant's storefront profile.
pub struct StorefrontEditor {
    tenant: TenantContext,
    backend: Arc<dyn StorefrontBackend>,
    state: RwLock<EditorState>,
    /// Save Draft and Publish both reset the baseline; only one may run.
    submitting: AtomicBool,
    saving: AtomicBool,
    publishing: AtomicBool,
    unpublishing: AtomicBool,
    cancelled: AtomicBool,
}

impl StorefrontEditor {
    /// Fetch both snapshots, merge them into the initial form state and
    /// fetch the breeding-program references.
    ///
    /// A failed reference fetch does not fail the load: the removal guard
    /// then treats no breed as linked and the server stays authoritative.
    pub async fn load(
        tenant: TenantContext,
        backend: Arc<dyn StorefrontBackend>,
    ) -> Result<Self, EditorError> {
        let snapshot = backend
            .fetch_profile(&tenant)
            .await
            .map_err(EditorError::Load)?;

        let form = merge_snapshots(snapshot.published.as_ref(), snapshot.draft.as_ref());

        let refs = match backend.fetch_breeding_program_references(&tenant).await {
            Ok(refs) => refs,
            Err(e) => {
                tracing::warn!(
                    tenant_id = tenant.tenant_id(),
                    error = %e,
                    "Breeding program reference fetch failed, breed removal guard fails open",
                );
                BreedingProgramRefs::fail_open()
            }
        };

        tracing::info!(
            tenant_id = tenant.tenant_id(),
            breeds = form.breeds.len(),
            programs = form.listed_programs.len(),
            published = snapshot.published_at.is_some(),
            "Storefront loaded",
        );

        let tracker = ChangeTracker::new(form.clone())?;
        Ok(Self {
            tenant,
            backend,
            state: RwLock::new(EditorState {
                form,
                tracker,
                published_at: snapshot.published_at,
                refs,
            }),
            submitting: AtomicBool::new(false),
            saving: AtomicBool::new(false),
            publishing: AtomicBool::new(false),
            unpublishing: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        })
    }

    pub fn tenant(&self) -> TenantContext {
        self.tenant
    }

    // -- reads ---------------------------------------------------------------

    /// Copy of the live form state.
    pub async fn form(&self) -> StorefrontProfile {
        self.state.read().await.form.clone()
    }

    pub async fn has_changes(&self) -> bool {
        let state = self.state.read().await;
        state.tracker.has_changes(&state.form)
    }

    pub async fn published_at(&self) -> Option<Timestamp> {
        self.state.read().await.published_at
    }

    pub async fn status(&self) -> PublishStatus {
        PublishStatus::from_published_at(self.state.read().await.published_at.as_ref())
    }

    /// Unmet publish preconditions for the current form.
    pub async fn readiness(&self) -> Vec<PublishRequirement> {
        publish_requirements(&self.state.read().await.form)
    }

    pub async fn preview(&self) -> PublicStorefront {
        public_view(&self.state.read().await.form)
    }

    pub async fn can_remove_breed(&self, name: &str) -> RemovalCheck {
        let state = self.state.read().await;
        can_remove_breed(&state.form, name, &state.refs, state.published_at.is_some())
    }

    pub async fn can_hide_breed(&self, index: usize) -> bool {
        visibility::can_hide_breed(&self.state.read().await.form, index)
    }

    pub async fn available_location_modes(&self) -> Vec<LocationMode> {
        visibility::available_location_modes(&self.state.read().await.form.address)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn is_publishing(&self) -> bool {
        self.publishing.load(Ordering::Acquire)
    }

    pub fn is_unpublishing(&self) -> bool {
        self.unpublishing.load(Ordering::Acquire)
    }

    // -- edits ---------------------------------------------------------------

    /// Run one edit through the reducer. A rejection leaves the form as it was.
    pub async fn apply(&self, action: EditAction) -> Result<(), EditorError> {
        let mut state = self.state.write().await;
        let next = apply_edit(
            &state.form,
            action,
            &EditContext {
                refs: &state.refs,
                is_published: state.published_at.is_some(),
            },
        )?;
        state.form = next;
        Ok(())
    }

    pub async fn set_breed_visibility(
        &self,
        index: usize,
        public: bool,
    ) -> Result<(), EditorError> {
        self.apply(EditAction::SetBreedVisibility { index, public })
            .await
    }

    pub async fn remove_breed(&self, index: usize) -> Result<(), EditorError> {
        self.apply(EditAction::RemoveBreed { index }).await
    }

    // -- persistence ---------------------------------------------------------

    pub async fn save_draft(&self) -> Result<(), EditorError> {
        self.persist(GateAction::SaveDraft).await
    }

    pub async fn publish(&self) -> Result<(), EditorError> {
        self.persist(GateAction::Publish).await
    }

    /// Take the storefront offline. `confirmed` is the operator's answer to
    /// the confirmation prompt.
    pub async fn unpublish(&self, confirmed: bool) -> Result<(), EditorError> {
        self.persist(GateAction::Unpublish { confirmed }).await
    }

    /// Mark the session as closed. Calls still in flight complete on the
    /// server but their results are no longer applied.
    pub fn detach(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_detached(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn flags_for(&self, action: GateAction) -> (&AtomicBool, &AtomicBool, &'static str) {
        match action {
            GateAction::SaveDraft => (&self.submitting, &self.saving, "save_draft"),
            GateAction::Publish => (&self.submitting, &self.publishing, "publish"),
            GateAction::Unpublish { .. } => (&self.unpublishing, &self.unpublishing, "unpublish"),
        }
    }

    async fn persist(&self, action: GateAction) -> Result<(), EditorError> {
        let (lock, indicator, name) = self.flags_for(action);
        let _in_flight =
            InFlight::acquire(lock, indicator).ok_or(EditorError::Busy { action: name })?;

        let (call, submitted) = {
            let state = self.state.read().await;
            let status = PublishStatus::from_published_at(state.published_at.as_ref());
            let has_changes = state.tracker.has_changes(&state.form);
            let call = evaluate(status, action, &state.form, has_changes)?;
            (call, state.form.clone())
        };

        let result = match call {
            PersistCall::SaveDraft => self.backend.save_draft(&self.tenant, &submitted).await,
            PersistCall::Publish => self.backend.publish(&self.tenant, &submitted).await,
            PersistCall::Unpublish => self.backend.unpublish(&self.tenant).await,
        };

        if self.is_detached() {
            tracing::debug!(
                tenant_id = self.tenant.tenant_id(),
                action = call.as_str(),
                succeeded = result.is_ok(),
                "Editor detached, discarding response",
            );
            return Err(EditorError::Detached {
                action: call.as_str(),
            });
        }

        if let Err(e) = result {
            tracing::warn!(
                tenant_id = self.tenant.tenant_id(),
                action = call.as_str(),
                error = %e,
                "Storefront persistence failed",
            );
            return Err(EditorError::Persistence {
                action: call.as_str(),
                message: e.user_message(call.failure_message()),
            });
        }

        let mut state = self.state.write().await;
        if call != PersistCall::Unpublish {
            state.tracker.reset(submitted)?;
        }
        state.published_at = published_at_after(call, state.published_at, chrono::Utc::now());

        tracing::info!(
            tenant_id = self.tenant.tenant_id(),
            action = call.as_str(),
            status = PublishStatus::from_published_at(state.published_at.as_ref()).as_str(),
            "Storefront persisted",
        );
        Ok(())
    }
}
