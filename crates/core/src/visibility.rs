//! Public/unlisted toggles for storefront fields and collection items.
//!
//! Two kinds of constraint apply:
//!
//! - A breed cannot be hidden while a public-eligible program lists it as
//!   its breed. That toggle is rejected with [`VisibilityError::BreedInUse`].
//! - Any other toggle to "public" is simply unavailable while the content
//!   behind it is empty. Such a toggle is a no-op, not an error.

use crate::profile::{has_text, Address, CredentialCategory, LocationMode, StorefrontProfile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisibilityError {
    #[error("{breed} is listed in the public program \"{program}\" and cannot be hidden")]
    BreedInUse { breed: String, program: String },

    #[error("No {collection} entry at index {index}")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
    },
}

/// A toggleable piece of storefront content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityField {
    BusinessName,
    Bio,
    YearEstablished,
    Logo,
    Banner,
    Website,
    Instagram,
    Facebook,
    Credential(CredentialCategory),
    Policies,
    ProgramCoverImage(usize),
    ProgramWhatsIncluded(usize),
    ProgramWaitTime(usize),
}

impl VisibilityField {
    fn program_index(self) -> Option<usize> {
        match self {
            Self::ProgramCoverImage(i)
            | Self::ProgramWhatsIncluded(i)
            | Self::ProgramWaitTime(i) => Some(i),
            _ => None,
        }
    }
}

fn check_program_index(
    profile: &StorefrontProfile,
    field: VisibilityField,
) -> Result<(), VisibilityError> {
    match field.program_index() {
        Some(index) if index >= profile.listed_programs.len() => {
            Err(VisibilityError::IndexOutOfRange {
                collection: "program",
                index,
            })
        }
        _ => Ok(()),
    }
}

/// Whether the content behind `field` is non-empty.
///
/// Program fields with an out-of-range index have no content.
pub fn has_content(profile: &StorefrontProfile, field: VisibilityField) -> bool {
    let program = |i: usize| profile.listed_programs.get(i);
    match field {
        VisibilityField::BusinessName => has_text(profile.business_name.as_deref()),
        VisibilityField::Bio => has_text(profile.bio.as_deref()),
        VisibilityField::YearEstablished => has_text(profile.year_established.as_deref()),
        VisibilityField::Logo => has_text(profile.logo_url.as_deref()),
        VisibilityField::Banner => has_text(profile.banner_image_url.as_deref()),
        VisibilityField::Website => has_text(profile.website_url.as_deref()),
        VisibilityField::Instagram => has_text(profile.instagram.as_deref()),
        VisibilityField::Facebook => has_text(profile.facebook.as_deref()),
        VisibilityField::Credential(category) => {
            !profile.standards_and_credentials.items(category).is_empty()
        }
        VisibilityField::Policies => {
            let policies = &profile.placement_policies;
            policies.any_enabled() || has_text(policies.note.as_deref())
        }
        VisibilityField::ProgramCoverImage(i) => {
            program(i).is_some_and(|p| has_text(p.cover_image_url.as_deref()))
        }
        VisibilityField::ProgramWhatsIncluded(i) => {
            program(i).is_some_and(|p| has_text(p.whats_included.as_deref()))
        }
        VisibilityField::ProgramWaitTime(i) => {
            program(i).is_some_and(|p| has_text(p.typical_wait_time.as_deref()))
        }
    }
}

/// Current value of the visibility flag behind `field`.
pub fn is_shown(profile: &StorefrontProfile, field: VisibilityField) -> bool {
    let program = |i: usize| profile.listed_programs.get(i);
    match field {
        VisibilityField::BusinessName => profile.show_business_name,
        VisibilityField::Bio => profile.show_bio,
        VisibilityField::YearEstablished => profile.show_year_established,
        VisibilityField::Logo => profile.show_logo,
        VisibilityField::Banner => profile.show_banner,
        VisibilityField::Website => profile.show_website,
        VisibilityField::Instagram => profile.show_instagram,
        VisibilityField::Facebook => profile.show_facebook,
        VisibilityField::Credential(category) => {
            profile.standards_and_credentials.is_shown(category)
        }
        VisibilityField::Policies => profile.placement_policies.show_policies,
        VisibilityField::ProgramCoverImage(i) => program(i).is_some_and(|p| p.show_cover_image),
        VisibilityField::ProgramWhatsIncluded(i) => {
            program(i).is_some_and(|p| p.show_whats_included)
        }
        VisibilityField::ProgramWaitTime(i) => program(i).is_some_and(|p| p.show_wait_time),
    }
}

/// Flip the flag behind `field`.
///
/// Returns `Ok(false)` without touching the profile when asked to show a
/// field whose content is empty.
pub fn set_field_visibility(
    profile: &mut StorefrontProfile,
    field: VisibilityField,
    show: bool,
) -> Result<bool, VisibilityError> {
    check_program_index(profile, field)?;
    if show && !has_content(profile, field) {
        return Ok(false);
    }

    match field {
        VisibilityField::BusinessName => profile.show_business_name = show,
        VisibilityField::Bio => profile.show_bio = show,
        VisibilityField::YearEstablished => profile.show_year_established = show,
        VisibilityField::Logo => profile.show_logo = show,
        VisibilityField::Banner => profile.show_banner = show,
        VisibilityField::Website => profile.show_website = show,
        VisibilityField::Instagram => profile.show_instagram = show,
        VisibilityField::Facebook => profile.show_facebook = show,
        VisibilityField::Credential(category) => {
            profile.standards_and_credentials.set_shown(category, show)
        }
        VisibilityField::Policies => profile.placement_policies.show_policies = show,
        VisibilityField::ProgramCoverImage(i) => profile.listed_programs[i].show_cover_image = show,
        VisibilityField::ProgramWhatsIncluded(i) => {
            profile.listed_programs[i].show_whats_included = show
        }
        VisibilityField::ProgramWaitTime(i) => profile.listed_programs[i].show_wait_time = show,
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Breeds
// ---------------------------------------------------------------------------

/// Make a roster breed public or unlisted.
///
/// Hiding is rejected while a public-eligible program names the breed.
/// Only the targeted entry changes.
pub fn set_breed_visibility(
    profile: &mut StorefrontProfile,
    index: usize,
    make_public: bool,
) -> Result<(), VisibilityError> {
    let breed = profile
        .breeds
        .get(index)
        .ok_or(VisibilityError::IndexOutOfRange {
            collection: "breed",
            index,
        })?;

    if !make_public {
        if let Some(program) = profile.public_program_for_breed(&breed.name) {
            return Err(VisibilityError::BreedInUse {
                breed: breed.name.clone(),
                program: program.name.clone(),
            });
        }
    }

    profile.breeds[index].is_public = make_public;
    Ok(())
}

/// Whether the breed at `index` may currently be hidden.
pub fn can_hide_breed(profile: &StorefrontProfile, index: usize) -> bool {
    profile
        .breeds
        .get(index)
        .is_some_and(|b| profile.public_program_for_breed(&b.name).is_none())
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Whether the address has the parts a location mode reveals.
pub fn location_mode_available(address: &Address, mode: LocationMode) -> bool {
    match mode {
        LocationMode::Hidden => true,
        LocationMode::ZipOnly => has_text(address.zip.as_deref()),
        LocationMode::CityState => {
            has_text(address.city.as_deref()) || has_text(address.state.as_deref())
        }
        LocationMode::Full => has_text(address.street_address.as_deref()),
    }
}

pub fn available_location_modes(address: &Address) -> Vec<LocationMode> {
    [
        LocationMode::Hidden,
        LocationMode::ZipOnly,
        LocationMode::CityState,
        LocationMode::Full,
    ]
    .into_iter()
    .filter(|mode| location_mode_available(address, *mode))
    .collect()
}

/// Select a public location mode. Unavailable modes leave the profile as is
/// and return `false`.
pub fn set_location_mode(profile: &mut StorefrontProfile, mode: LocationMode) -> bool {
    if !location_mode_available(&profile.address, mode) {
        return false;
    }
    profile.public_location_mode = mode;
    true
}
