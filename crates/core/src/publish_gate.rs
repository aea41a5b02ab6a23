//! Publish gate: local preconditions for Save Draft, Publish and Unpublish.
//!
//! The storefront is either Unpublished or Published, tracked externally by
//! `publishedAt`. The gate decides which persistence call an action maps to,
//! or blocks it before any network call. The server re-validates the same
//! preconditions and stays authoritative.
//!
//! | From        | Action    | Precondition                              | Call       |
//! |-------------|-----------|-------------------------------------------|------------|
//! | either      | Publish   | business name set and at least one breed  | `Publish`  |
//! | Published   | Unpublish | operator confirmed                        | `Unpublish`|
//! | either      | SaveDraft | unsaved changes                           | `SaveDraft`|

use serde::Serialize;

use crate::profile::{has_text, StorefrontProfile};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Unpublished,
    Published,
}

impl PublishStatus {
    pub fn from_published_at(published_at: Option<&Timestamp>) -> Self {
        match published_at {
            Some(_) => Self::Published,
            None => Self::Unpublished,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::Published => "published",
        }
    }
}

// ---------------------------------------------------------------------------
// Publish requirements
// ---------------------------------------------------------------------------

/// A minimum-content requirement for publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishRequirement {
    BusinessName,
    Breeds,
}

impl PublishRequirement {
    /// Form field the requirement is reported against.
    pub fn field(self) -> &'static str {
        match self {
            Self::BusinessName => "businessName",
            Self::Breeds => "breeds",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::BusinessName => "Business name is required to publish",
            Self::Breeds => "Add at least one breed before publishing",
        }
    }
}

/// Unmet publish requirements, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.missing))]
pub struct PublishBlocked {
    pub missing: Vec<PublishRequirement>,
}

impl PublishBlocked {
    pub fn messages(&self) -> Vec<&'static str> {
        self.missing.iter().map(|r| r.message()).collect()
    }
}

fn join_messages(missing: &[PublishRequirement]) -> String {
    missing
        .iter()
        .map(|r| r.message())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every requirement `profile` does not meet yet.
pub fn publish_requirements(profile: &StorefrontProfile) -> Vec<PublishRequirement> {
    let mut missing = Vec::new();
    if !has_text(profile.business_name.as_deref()) {
        missing.push(PublishRequirement::BusinessName);
    }
    if profile.breeds.is_empty() {
        missing.push(PublishRequirement::Breeds);
    }
    missing
}

pub fn check_publish(profile: &StorefrontProfile) -> Result<(), PublishBlocked> {
    let missing = publish_requirements(profile);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PublishBlocked { missing })
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    SaveDraft,
    Publish,
    Unpublish { confirmed: bool },
}

/// The persistence call an allowed action maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistCall {
    SaveDraft,
    Publish,
    Unpublish,
}

impl PersistCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaveDraft => "save_draft",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
        }
    }

    /// Fallback shown when the server gives no reason for a failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::SaveDraft => "Failed to save draft. Please try again.",
            Self::Publish => "Failed to publish storefront. Please try again.",
            Self::Unpublish => "Failed to unpublish storefront. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateBlock {
    #[error(transparent)]
    Publish(#[from] PublishBlocked),

    #[error("There are no unsaved changes")]
    NoChanges,

    #[error("The storefront is not published")]
    NotPublished,

    #[error("Unpublishing must be confirmed")]
    UnpublishNotConfirmed,
}

/// Decide whether `action` may proceed from `status`.
pub fn evaluate(
    status: PublishStatus,
    action: GateAction,
    profile: &StorefrontProfile,
    has_changes: bool,
) -> Result<PersistCall, GateBlock> {
    match action {
        GateAction::SaveDraft => {
            if has_changes {
                Ok(PersistCall::SaveDraft)
            } else {
                Err(GateBlock::NoChanges)
            }
        }
        // Publishing with no changes is allowed as a refresh.
        GateAction::Publish => {
            check_publish(profile)?;
            Ok(PersistCall::Publish)
        }
        GateAction::Unpublish { confirmed } => match status {
            PublishStatus::Unpublished => Err(GateBlock::NotPublished),
            PublishStatus::Published if !confirmed => Err(GateBlock::UnpublishNotConfirmed),
            PublishStatus::Published => Ok(PersistCall::Unpublish),
        },
    }
}

/// `publishedAt` after a confirmed `call`. A republish keeps the original
/// timestamp; Save Draft never touches it.
pub fn published_at_after(
    call: PersistCall,
    current: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match call {
        PersistCall::Publish => Some(current.unwrap_or(now)),
        PersistCall::Unpublish => None,
        PersistCall::SaveDraft => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BreedEntry, Species};
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn publishable() -> StorefrontProfile {
        StorefrontProfile {
            business_name: Some("Acme Kennels".into()),
            breeds: vec![BreedEntry::new("Labrador", Species::Dog)],
            ..Default::default()
        }
    }

    // -- requirements ---------------------------------------------------------

    #[test]
    fn complete_profile_has_no_missing_requirements() {
        assert!(publish_requirements(&publishable()).is_empty());
        assert!(check_publish(&publishable()).is_ok());
    }

    #[test]
    fn blank_business_name_is_reported() {
        let mut profile = publishable();
        profile.business_name = Some("   ".into());
        let blocked = check_publish(&profile).unwrap_err();
        assert_eq!(blocked.missing, vec![PublishRequirement::BusinessName]);
        assert_eq!(blocked.missing[0].field(), "businessName");
    }

    #[test]
    fn empty_roster_is_reported() {
        let mut profile = publishable();
        profile.breeds.clear();
        let blocked = check_publish(&profile).unwrap_err();
        assert_eq!(blocked.missing, vec![PublishRequirement::Breeds]);
        assert!(blocked.to_string().contains("at least one breed"));
    }

    #[test]
    fn all_missing_requirements_are_listed() {
        let blocked = check_publish(&StorefrontProfile::default()).unwrap_err();
        assert_eq!(
            blocked.missing,
            vec![PublishRequirement::BusinessName, PublishRequirement::Breeds]
        );
        assert_eq!(blocked.messages().len(), 2);
    }

    // -- evaluate -------------------------------------------------------------

    #[test]
    fn publish_from_either_state() {
        for status in [PublishStatus::Unpublished, PublishStatus::Published] {
            assert_eq!(
                evaluate(status, GateAction::Publish, &publishable(), false),
                Ok(PersistCall::Publish)
            );
        }
    }

    #[test]
    fn publish_blocked_without_content() {
        assert_matches!(
            evaluate(
                PublishStatus::Unpublished,
                GateAction::Publish,
                &StorefrontProfile::default(),
                true
            ),
            Err(GateBlock::Publish(_))
        );
    }

    #[test]
    fn save_draft_needs_changes() {
        let profile = publishable();
        assert_eq!(
            evaluate(PublishStatus::Published, GateAction::SaveDraft, &profile, false),
            Err(GateBlock::NoChanges)
        );
        assert_eq!(
            evaluate(PublishStatus::Published, GateAction::SaveDraft, &profile, true),
            Ok(PersistCall::SaveDraft)
        );
    }

    #[test]
    fn unpublish_rules() {
        let profile = publishable();
        assert_eq!(
            evaluate(
                PublishStatus::Unpublished,
                GateAction::Unpublish { confirmed: true },
                &profile,
                false
            ),
            Err(GateBlock::NotPublished)
        );
        assert_eq!(
            evaluate(
                PublishStatus::Published,
                GateAction::Unpublish { confirmed: false },
                &profile,
                false
            ),
            Err(GateBlock::UnpublishNotConfirmed)
        );
        assert_eq!(
            evaluate(
                PublishStatus::Published,
                GateAction::Unpublish { confirmed: true },
                &profile,
                false
            ),
            Ok(PersistCall::Unpublish)
        );
    }

    // -- published_at_after ---------------------------------------------------

    #[test]
    fn published_at_transitions() {
        let earlier = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        assert_eq!(published_at_after(PersistCall::Publish, None, now), Some(now));
        assert_eq!(
            published_at_after(PersistCall::Publish, Some(earlier), now),
            Some(earlier)
        );
        assert_eq!(published_at_after(PersistCall::Unpublish, Some(earlier), now), None);
        assert_eq!(published_at_after(PersistCall::SaveDraft, None, now), None);
    }

    #[test]
    fn status_from_published_at() {
        let now = Utc::now();
        assert_eq!(PublishStatus::from_published_at(Some(&now)), PublishStatus::Published);
        assert_eq!(PublishStatus::from_published_at(None), PublishStatus::Unpublished);
        assert_eq!(PublishStatus::Published.as_str(), "published");
    }
}
