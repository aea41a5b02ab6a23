//! Storefront edit reducer.
//!
//! Every in-memory form edit goes through [`apply_edit`], which returns the
//! next form state or a rejection. Cascading rules (deposit vs. reservation
//! fee, breed hide/remove constraints, content-gated visibility toggles)
//! live here rather than in individual UI handlers.

use crate::profile::{
    truncate_chars, Address, BreedEntry, CredentialCategory, LocationMode, PolicyFlag,
    PricingTier, ProgramEntry, Species, StorefrontProfile, MAX_CREDENTIAL_NOTE_LENGTH,
    MAX_POLICIES_NOTE_LENGTH,
};
use crate::roster::{self, BreedingProgramRefs, RosterError};
use crate::visibility::{self, VisibilityError, VisibilityField};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Free-text profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    BusinessName,
    Bio,
    YearEstablished,
    LogoUrl,
    BannerImageUrl,
    WebsiteUrl,
    Instagram,
    Facebook,
}

/// A single-field change to a listed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramEdit {
    Name(String),
    Species(Species),
    BreedText(Option<String>),
    Description(Option<String>),
    ProgramStory(Option<String>),
    CoverImageUrl(Option<String>),
    AcceptInquiries(bool),
    OpenWaitlist(bool),
    AcceptReservations(bool),
    ComingSoon(bool),
    PricingTiers(Vec<PricingTier>),
    WhatsIncluded(Option<String>),
    TypicalWaitTime(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    SetText {
        field: TextField,
        value: Option<String>,
    },
    SetVisibility {
        field: VisibilityField,
        show: bool,
    },
    SetAddress(Address),
    SetLocationMode(LocationMode),
    AddBreed(BreedEntry),
    RemoveBreed {
        index: usize,
    },
    SetBreedVisibility {
        index: usize,
        public: bool,
    },
    AddCredential {
        category: CredentialCategory,
        item: String,
    },
    RemoveCredential {
        category: CredentialCategory,
        item: String,
    },
    SetCredentialNote {
        category: CredentialCategory,
        note: Option<String>,
    },
    SetPolicy {
        flag: PolicyFlag,
        enabled: bool,
    },
    SetPoliciesNote(Option<String>),
    AddProgram(ProgramEntry),
    EditProgram {
        index: usize,
        edit: ProgramEdit,
    },
    RemoveProgram {
        index: usize,
    },
}

/// External facts some edits are checked against.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub refs: &'a BreedingProgramRefs,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditRejected {
    #[error(transparent)]
    Visibility(#[from] VisibilityError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("No program at index {index}")]
    ProgramIndexOutOfRange { index: usize },
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

fn text_slot(profile: &mut StorefrontProfile, field: TextField) -> &mut Option<String> {
    match field {
        TextField::BusinessName => &mut profile.business_name,
        TextField::Bio => &mut profile.bio,
        TextField::YearEstablished => &mut profile.year_established,
        TextField::LogoUrl => &mut profile.logo_url,
        TextField::BannerImageUrl => &mut profile.banner_image_url,
        TextField::WebsiteUrl => &mut profile.website_url,
        TextField::Instagram => &mut profile.instagram,
        TextField::Facebook => &mut profile.facebook,
    }
}

fn apply_program_edit(program: &mut ProgramEntry, edit: ProgramEdit) {
    match edit {
        ProgramEdit::Name(v) => program.name = v,
        ProgramEdit::Species(v) => program.species = v,
        ProgramEdit::BreedText(v) => program.breed_text = v,
        ProgramEdit::Description(v) => program.description = v,
        ProgramEdit::ProgramStory(v) => program.program_story = v,
        ProgramEdit::CoverImageUrl(v) => program.cover_image_url = v,
        ProgramEdit::AcceptInquiries(v) => program.accept_inquiries = v,
        ProgramEdit::OpenWaitlist(v) => program.open_waitlist = v,
        ProgramEdit::AcceptReservations(v) => program.accept_reservations = v,
        ProgramEdit::ComingSoon(v) => program.coming_soon = v,
        ProgramEdit::PricingTiers(v) => program.pricing_tiers = v,
        ProgramEdit::WhatsIncluded(v) => program.whats_included = v,
        ProgramEdit::TypicalWaitTime(v) => program.typical_wait_time = v,
    }
}

/// Apply one edit to a copy of `state`.
///
/// No-op edits (duplicate breed, toggling empty content public, unavailable
/// location mode) return an unchanged copy rather than an error.
pub fn apply_edit(
    state: &StorefrontProfile,
    action: EditAction,
    ctx: &EditContext<'_>,
) -> Result<StorefrontProfile, EditRejected> {
    let mut next = state.clone();

    match action {
        EditAction::SetText { field, value } => *text_slot(&mut next, field) = value,
        EditAction::SetVisibility { field, show } => {
            visibility::set_field_visibility(&mut next, field, show)?;
        }
        EditAction::SetAddress(address) => next.address = address,
        EditAction::SetLocationMode(mode) => {
            visibility::set_location_mode(&mut next, mode);
        }
        EditAction::AddBreed(entry) => {
            roster::add_breed(&mut next, entry);
        }
        EditAction::RemoveBreed { index } => {
            roster::remove_breed(&mut next, index, ctx.refs, ctx.is_published)?;
        }
        EditAction::SetBreedVisibility { index, public } => {
            visibility::set_breed_visibility(&mut next, index, public)?;
        }
        EditAction::AddCredential { category, item } => {
            let item = item.trim().to_string();
            let items = next.standards_and_credentials.items_mut(category);
            if !item.is_empty() && !items.contains(&item) {
                items.push(item);
            }
        }
        EditAction::RemoveCredential { category, item } => {
            next.standards_and_credentials
                .items_mut(category)
                .retain(|existing| existing != &item);
        }
        EditAction::SetCredentialNote { category, note } => {
            let note = note.map(|n| truncate_chars(&n, MAX_CREDENTIAL_NOTE_LENGTH));
            next.standards_and_credentials.set_note(category, note);
        }
        EditAction::SetPolicy { flag, enabled } => {
            next.placement_policies.set(flag, enabled);
            if enabled {
                if let Some(other) = flag.exclusive_with() {
                    next.placement_policies.set(other, false);
                }
            }
        }
        EditAction::SetPoliciesNote(note) => {
            next.placement_policies.note =
                note.map(|n| truncate_chars(&n, MAX_POLICIES_NOTE_LENGTH));
        }
        EditAction::AddProgram(program) => next.listed_programs.push(program),
        EditAction::EditProgram { index, edit } => {
            let program = next
                .listed_programs
                .get_mut(index)
                .ok_or(EditRejected::ProgramIndexOutOfRange { index })?;
            apply_program_edit(program, edit);
        }
        EditAction::RemoveProgram { index } => {
            if index >= next.listed_programs.len() {
                return Err(EditRejected::ProgramIndexOutOfRange { index });
            }
            next.listed_programs.remove(index);
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RemovalDenial;
    use assert_matches::assert_matches;

    fn base() -> StorefrontProfile {
        let mut program = ProgramEntry::named("Program A");
        program.breed_text = Some("Labrador".into());
        StorefrontProfile {
            business_name: Some("Acme".into()),
            breeds: vec![BreedEntry::new("Labrador", Species::Dog)],
            listed_programs: vec![program],
            ..Default::default()
        }
    }

    fn apply(
        state: &StorefrontProfile,
        action: EditAction,
    ) -> Result<StorefrontProfile, EditRejected> {
        let refs = BreedingProgramRefs::fail_open();
        apply_edit(
            state,
            action,
            &EditContext {
                refs: &refs,
                is_published: false,
            },
        )
    }

    // -- text / visibility ----------------------------------------------------

    #[test]
    fn set_text_leaves_visibility_alone() {
        let mut state = base();
        state.show_bio = true;
        let next = apply(
            &state,
            EditAction::SetText {
                field: TextField::Bio,
                value: None,
            },
        )
        .unwrap();
        assert_eq!(next.bio, None);
        assert!(next.show_bio);
    }

    #[test]
    fn reducer_does_not_mutate_input() {
        let state = base();
        let _ = apply(
            &state,
            EditAction::SetText {
                field: TextField::BusinessName,
                value: Some("Other".into()),
            },
        )
        .unwrap();
        assert_eq!(state.business_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn showing_empty_content_is_a_noop() {
        let state = base();
        let next = apply(
            &state,
            EditAction::SetVisibility {
                field: VisibilityField::Website,
                show: true,
            },
        )
        .unwrap();
        assert_eq!(next, state);
    }

    // -- breeds ---------------------------------------------------------------

    #[test]
    fn duplicate_breed_add_is_a_noop() {
        let state = base();
        let duplicate = BreedEntry::new("LABRADOR", Species::Dog);
        let next = apply(&state, EditAction::AddBreed(duplicate)).unwrap();
        assert_eq!(next.breeds.len(), 1);
    }

    #[test]
    fn hiding_referenced_breed_is_rejected() {
        let state = base();
        assert_matches!(
            apply(&state, EditAction::SetBreedVisibility { index: 0, public: false }),
            Err(EditRejected::Visibility(VisibilityError::BreedInUse { .. }))
        );
    }

    #[test]
    fn removing_linked_breed_is_rejected() {
        let state = base();
        let refs = BreedingProgramRefs::new(["labrador"]);
        let ctx = EditContext {
            refs: &refs,
            is_published: false,
        };
        assert_matches!(
            apply_edit(&state, EditAction::RemoveBreed { index: 0 }, &ctx),
            Err(EditRejected::Roster(RosterError::Denied(RemovalDenial::LinkedToProgram)))
        );
    }

    #[test]
    fn removing_last_breed_while_published_is_rejected() {
        let state = base();
        let refs = BreedingProgramRefs::fail_open();
        let ctx = EditContext {
            refs: &refs,
            is_published: true,
        };
        assert!(apply_edit(&state, EditAction::RemoveBreed { index: 0 }, &ctx).is_err());

        let ctx = EditContext {
            refs: &refs,
            is_published: false,
        };
        let next = apply_edit(&state, EditAction::RemoveBreed { index: 0 }, &ctx).unwrap();
        assert!(next.breeds.is_empty());
    }

    // -- credentials ----------------------------------------------------------

    #[test]
    fn credential_items_are_trimmed_and_deduplicated() {
        let state = base();
        let category = CredentialCategory::HealthPractices;
        let next = apply(
            &state,
            EditAction::AddCredential {
                category,
                item: " OFA hips ".into(),
            },
        )
        .unwrap();
        let next = apply(
            &next,
            EditAction::AddCredential {
                category,
                item: "OFA hips".into(),
            },
        )
        .unwrap();
        assert_eq!(next.standards_and_credentials.health_practices, vec!["OFA hips"]);

        let next = apply(
            &next,
            EditAction::RemoveCredential {
                category,
                item: "OFA hips".into(),
            },
        )
        .unwrap();
        assert!(next.standards_and_credentials.health_practices.is_empty());
    }

    #[test]
    fn credential_note_is_capped() {
        let state = base();
        let next = apply(
            &state,
            EditAction::SetCredentialNote {
                category: CredentialCategory::CarePractices,
                note: Some("x".repeat(250)),
            },
        )
        .unwrap();
        let note = next.standards_and_credentials.care_practices_note.unwrap();
        assert_eq!(note.chars().count(), MAX_CREDENTIAL_NOTE_LENGTH);
    }

    // -- policies -------------------------------------------------------------

    #[test]
    fn deposit_and_reservation_fee_exclude_each_other() {
        let state = base();
        let next = apply(
            &state,
            EditAction::SetPolicy {
                flag: PolicyFlag::RequireDeposit,
                enabled: true,
            },
        )
        .unwrap();
        assert!(next.placement_policies.require_deposit);

        let next = apply(
            &next,
            EditAction::SetPolicy {
                flag: PolicyFlag::RequireReservationFee,
                enabled: true,
            },
        )
        .unwrap();
        assert!(next.placement_policies.require_reservation_fee);
        assert!(!next.placement_policies.require_deposit);
    }

    #[test]
    fn disabling_a_policy_leaves_its_partner() {
        let mut state = base();
        state.placement_policies.require_deposit = true;
        let next = apply(
            &state,
            EditAction::SetPolicy {
                flag: PolicyFlag::RequireReservationFee,
                enabled: false,
            },
        )
        .unwrap();
        assert!(next.placement_policies.require_deposit);
    }

    #[test]
    fn policies_note_is_capped() {
        let next = apply(&base(), EditAction::SetPoliciesNote(Some("y".repeat(400)))).unwrap();
        assert_eq!(
            next.placement_policies.note.unwrap().chars().count(),
            MAX_POLICIES_NOTE_LENGTH
        );
    }

    // -- programs -------------------------------------------------------------

    #[test]
    fn clearing_program_name_unlocks_breed_hiding() {
        let state = base();
        let next = apply(
            &state,
            EditAction::EditProgram {
                index: 0,
                edit: ProgramEdit::Name(String::new()),
            },
        )
        .unwrap();
        let hide = EditAction::SetBreedVisibility {
            index: 0,
            public: false,
        };
        let next = apply(&next, hide).unwrap();
        assert!(!next.breeds[0].is_public);
    }

    #[test]
    fn program_index_is_checked() {
        let state = base();
        assert_matches!(
            apply(&state, EditAction::RemoveProgram { index: 4 }),
            Err(EditRejected::ProgramIndexOutOfRange { index: 4 })
        );
        assert_matches!(
            apply(
                &state,
                EditAction::EditProgram {
                    index: 4,
                    edit: ProgramEdit::ComingSoon(true)
                }
            ),
            Err(EditRejected::ProgramIndexOutOfRange { index: 4 })
        );
    }

    #[test]
    fn add_and_remove_program() {
        let state = base();
        let next = apply(&state, EditAction::AddProgram(ProgramEntry::named("Fall"))).unwrap();
        assert_eq!(next.listed_programs.len(), 2);
        let next = apply(&next, EditAction::RemoveProgram { index: 0 }).unwrap();
        assert_eq!(next.listed_programs[0].name, "Fall");
    }
}
