//! Breed roster maintenance: identity-deduplicated adds and guarded removal.
//!
//! A breed cannot leave the roster while an external breeding program
//! references it, nor when it is the last breed of a live storefront. The
//! breeding-program reference set comes from a collaborator and is fetched
//! best-effort; when that fetch fails the caller uses
//! [`BreedingProgramRefs::fail_open`] and the server stays authoritative.

use std::collections::HashSet;

use serde::Serialize;

use crate::profile::{BreedEntry, StorefrontProfile};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a breed may not be removed. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RemovalDenial {
    #[error("linked to a breeding program")]
    LinkedToProgram,

    #[error("cannot remove the last breed while published")]
    LastBreedWhilePublished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Denied(#[from] RemovalDenial),

    #[error("No breed at index {index}")]
    IndexOutOfRange { index: usize },
}

/// Result of a removal check, shaped for the editor UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalCheck {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Result<(), RemovalDenial>> for RemovalCheck {
    fn from(result: Result<(), RemovalDenial>) -> Self {
        match result {
            Ok(()) => Self {
                allowed: true,
                reason: None,
            },
            Err(denial) => Self {
                allowed: false,
                reason: Some(denial.to_string()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Breeding-program references
// ---------------------------------------------------------------------------

/// Lower-cased breed texts referenced by the tenant's breeding programs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedingProgramRefs {
    names: HashSet<String>,
}

impl BreedingProgramRefs {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// An empty reference set: no breed counts as linked.
    pub fn fail_open() -> Self {
        Self::default()
    }

    pub fn contains(&self, breed_name: &str) -> bool {
        self.names.contains(&breed_name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Append `entry` unless a breed with the same identity is already listed.
///
/// Returns `false` when nothing was added (duplicate or blank name).
pub fn add_breed(profile: &mut StorefrontProfile, entry: BreedEntry) -> bool {
    if entry.name.trim().is_empty() || profile.find_breed(&entry).is_some() {
        return false;
    }
    profile.breeds.push(entry);
    true
}

/// Evaluate the removal rules for the breed called `name`. First match wins.
pub fn check_breed_removal(
    profile: &StorefrontProfile,
    name: &str,
    refs: &BreedingProgramRefs,
    is_published: bool,
) -> Result<(), RemovalDenial> {
    if refs.contains(name) {
        return Err(RemovalDenial::LinkedToProgram);
    }
    if profile.breeds.len() <= 1 && is_published {
        return Err(RemovalDenial::LastBreedWhilePublished);
    }
    Ok(())
}

pub fn can_remove_breed(
    profile: &StorefrontProfile,
    name: &str,
    refs: &BreedingProgramRefs,
    is_published: bool,
) -> RemovalCheck {
    check_breed_removal(profile, name, refs, is_published).into()
}

/// Remove the breed at `index` if the rules allow it, returning the entry.
///
/// On denial the roster is untouched. Other entries keep their order and
/// visibility flags.
pub fn remove_breed(
    profile: &mut StorefrontProfile,
    index: usize,
    refs: &BreedingProgramRefs,
    is_published: bool,
) -> Result<BreedEntry, RosterError> {
    let name = profile
        .breeds
        .get(index)
        .map(|b| b.name.clone())
        .ok_or(RosterError::IndexOutOfRange { index })?;
    check_breed_removal(profile, &name, refs, is_published)?;
    Ok(profile.breeds.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Species;
    use assert_matches::assert_matches;

    fn roster(names: &[&str]) -> StorefrontProfile {
        StorefrontProfile {
            breeds: names.iter().map(|n| BreedEntry::new(*n, Species::Dog)).collect(),
            ..Default::default()
        }
    }

    // -- add_breed ------------------------------------------------------------

    #[test]
    fn duplicate_identity_is_not_added() {
        let mut profile = roster(&["Labrador"]);
        assert!(!add_breed(&mut profile, BreedEntry::new("labrador", Species::Dog)));
        assert_eq!(profile.breeds.len(), 1);
    }

    #[test]
    fn same_name_other_species_is_added() {
        let mut profile = roster(&["Labrador"]);
        assert!(add_breed(&mut profile, BreedEntry::new("Labrador", Species::Cat)));
        assert_eq!(profile.breeds.len(), 2);
    }

    #[test]
    fn blank_name_is_not_added() {
        let mut profile = roster(&[]);
        assert!(!add_breed(&mut profile, BreedEntry::new("  ", Species::Dog)));
        assert!(profile.breeds.is_empty());
    }

    // -- BreedingProgramRefs --------------------------------------------------

    #[test]
    fn refs_are_case_insensitive() {
        let refs = BreedingProgramRefs::new(["Golden Retriever", ""]);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("golden retriever"));
        assert!(refs.contains("GOLDEN RETRIEVER"));
        assert!(!refs.contains("Poodle"));
        assert!(BreedingProgramRefs::fail_open().is_empty());
    }

    // -- can_remove_breed -----------------------------------------------------

    #[test]
    fn linked_breed_cannot_be_removed() {
        let profile = roster(&["Labrador", "Poodle"]);
        let refs = BreedingProgramRefs::new(["labrador"]);
        let check = can_remove_breed(&profile, "Labrador", &refs, false);
        assert!(!check.allowed);
        assert_eq!(check.reason.as_deref(), Some("linked to a breeding program"));
    }

    #[test]
    fn linkage_is_checked_before_last_breed_rule() {
        let profile = roster(&["Labrador"]);
        let refs = BreedingProgramRefs::new(["Labrador"]);
        assert_eq!(
            check_breed_removal(&profile, "Labrador", &refs, true),
            Err(RemovalDenial::LinkedToProgram)
        );
    }

    #[test]
    fn last_breed_while_published() {
        let profile = roster(&["Labrador"]);
        let refs = BreedingProgramRefs::fail_open();

        let check = can_remove_breed(&profile, "Labrador", &refs, true);
        assert!(!check.allowed);
        assert_eq!(
            check.reason.as_deref(),
            Some("cannot remove the last breed while published")
        );

        let check = can_remove_breed(&profile, "Labrador", &refs, false);
        assert!(check.allowed);
        assert_eq!(check.reason, None);
    }

    // -- remove_breed ---------------------------------------------------------

    #[test]
    fn removal_keeps_other_entries() {
        let mut profile = roster(&["Labrador", "Poodle", "Beagle"]);
        profile.breeds[2].is_public = false;

        let refs = BreedingProgramRefs::fail_open();
        let removed = remove_breed(&mut profile, 1, &refs, true).unwrap();
        assert_eq!(removed.name, "Poodle");
        assert_eq!(profile.breeds.len(), 2);
        assert_eq!(profile.breeds[0].name, "Labrador");
        assert!(!profile.breeds[1].is_public);
    }

    #[test]
    fn denied_removal_is_a_noop() {
        let mut profile = roster(&["Labrador"]);
        let result = remove_breed(&mut profile, 0, &BreedingProgramRefs::fail_open(), true);
        assert_matches!(
            result,
            Err(RosterError::Denied(RemovalDenial::LastBreedWhilePublished))
        );
        assert_eq!(profile.breeds.len(), 1);
    }

    #[test]
    fn removal_index_out_of_range() {
        let mut profile = roster(&["Labrador"]);
        assert_matches!(
            remove_breed(&mut profile, 5, &BreedingProgramRefs::fail_open(), false),
            Err(RosterError::IndexOutOfRange { index: 5 })
        );
    }
}
