//! Public storefront projection.
//!
//! Applies every visibility flag to a profile and returns what a visitor of
//! the marketplace would see. Breed `isPublic` only filters this view.

use serde::Serialize;

use crate::profile::{
    has_text, Address, BreedEntry, CredentialCategory, LocationMode, PricingTier,
    StorefrontProfile,
};
use crate::visibility::{has_content, VisibilityField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBreed {
    pub name: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProgram {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub description: Option<String>,
    pub program_story: Option<String>,
    pub cover_image_url: Option<String>,
    pub accept_inquiries: bool,
    pub open_waitlist: bool,
    pub accept_reservations: bool,
    pub coming_soon: bool,
    pub pricing_tiers: Vec<PricingTier>,
    pub whats_included: Option<String>,
    pub typical_wait_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCredentials {
    pub category: CredentialCategory,
    pub label: String,
    pub items: Vec<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPolicies {
    pub policies: Vec<String>,
    pub note: Option<String>,
}

/// What the public storefront renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStorefront {
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub year_established: Option<String>,
    pub logo_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub website_url: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub location: Option<String>,
    pub breeds: Vec<PublicBreed>,
    pub programs: Vec<PublicProgram>,
    pub credentials: Vec<PublicCredentials>,
    pub policies: Option<PublicPolicies>,
}

fn shown(value: &Option<String>, show: bool) -> Option<String> {
    if show && has_text(value.as_deref()) {
        value.clone()
    } else {
        None
    }
}

fn part(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn join_parts(parts: &[Option<&str>], sep: &str) -> Option<String> {
    let parts: Vec<&str> = parts.iter().flatten().copied().collect();
    (!parts.is_empty()).then(|| parts.join(sep))
}

/// Render the address according to the public location mode.
pub fn public_location(address: &Address, mode: LocationMode) -> Option<String> {
    match mode {
        LocationMode::Hidden => None,
        LocationMode::ZipOnly => part(&address.zip).map(str::to_string),
        LocationMode::CityState => join_parts(&[part(&address.city), part(&address.state)], ", "),
        LocationMode::Full => {
            let region = join_parts(&[part(&address.state), part(&address.zip)], " ");
            join_parts(
                &[
                    part(&address.street_address),
                    part(&address.city),
                    region.as_deref(),
                    part(&address.country),
                ],
                ", ",
            )
        }
    }
}

fn public_breed(breed: &BreedEntry) -> PublicBreed {
    PublicBreed {
        name: breed.name.clone(),
        species: breed.species.as_str().to_string(),
    }
}

/// Project `profile` onto its public view.
pub fn public_view(profile: &StorefrontProfile) -> PublicStorefront {
    let creds = &profile.standards_and_credentials;
    let policies = &profile.placement_policies;
    let show_policies =
        policies.show_policies && has_content(profile, VisibilityField::Policies);

    PublicStorefront {
        business_name: shown(&profile.business_name, profile.show_business_name),
        bio: shown(&profile.bio, profile.show_bio),
        year_established: shown(&profile.year_established, profile.show_year_established),
        logo_url: shown(&profile.logo_url, profile.show_logo),
        banner_image_url: shown(&profile.banner_image_url, profile.show_banner),
        website_url: shown(&profile.website_url, profile.show_website),
        instagram: shown(&profile.instagram, profile.show_instagram),
        facebook: shown(&profile.facebook, profile.show_facebook),
        location: public_location(&profile.address, profile.public_location_mode),
        breeds: profile
            .breeds
            .iter()
            .filter(|b| b.is_public)
            .map(public_breed)
            .collect(),
        programs: profile
            .listed_programs
            .iter()
            .filter(|p| p.is_public_eligible())
            .map(|p| PublicProgram {
                name: p.name.clone(),
                species: p.species.as_str().to_string(),
                breed: p.breed_text.clone().unwrap_or_default(),
                description: p.description.clone(),
                program_story: p.program_story.clone(),
                cover_image_url: shown(&p.cover_image_url, p.show_cover_image),
                accept_inquiries: p.accept_inquiries,
                open_waitlist: p.open_waitlist,
                accept_reservations: p.accept_reservations,
                coming_soon: p.coming_soon,
                pricing_tiers: p.pricing_tiers.clone(),
                whats_included: shown(&p.whats_included, p.show_whats_included),
                typical_wait_time: shown(&p.typical_wait_time, p.show_wait_time),
            })
            .collect(),
        credentials: CredentialCategory::ALL
            .into_iter()
            .filter(|c| creds.is_shown(*c) && !creds.items(*c).is_empty())
            .map(|c| PublicCredentials {
                category: c,
                label: c.label().to_string(),
                items: creds.items(c).to_vec(),
                note: creds.note(c).filter(|n| !n.trim().is_empty()).map(str::to_string),
            })
            .collect(),
        policies: show_policies.then(|| PublicPolicies {
            policies: policies
                .enabled()
                .into_iter()
                .map(|f| f.label().to_string())
                .collect(),
            note: shown(&policies.note, true),
        }),
    }
}
