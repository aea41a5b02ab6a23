//! Legacy profile normalization.
//!
//! Stored storefront documents predate the current schema in several ways:
//! breeds saved as bare strings, `listedBreeds` / `programs` instead of
//! `breeds` / `listedPrograms`, upper-case species, and missing visibility
//! flags. This module turns any stored JSON fragment into a canonical
//! [`StorefrontProfile`].
//!
//! Normalization never fails. Rows that cannot be read as an entry (nulls,
//! numbers, breed objects without a name) are dropped. Species values are
//! coerced, never a reason to drop a row. Every default is applied only
//! when the target field is absent, so normalizing an already-canonical
//! document is a no-op.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::profile::{
    has_text, Address, BreedEntry, BreedSource, CredentialCategory, LocationMode,
    PlacementPolicies, PolicyFlag, PricingTier, ProgramEntry, Species, StandardsAndCredentials,
    StorefrontProfile,
};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

pub const KEY_BREEDS: &str = "breeds";
/// Legacy alias of [`KEY_BREEDS`].
pub const KEY_LISTED_BREEDS: &str = "listedBreeds";
pub const KEY_LISTED_PROGRAMS: &str = "listedPrograms";
/// Legacy alias of [`KEY_LISTED_PROGRAMS`].
pub const KEY_PROGRAMS: &str = "programs";
pub const KEY_STANDARDS: &str = "standardsAndCredentials";
pub const KEY_POLICIES: &str = "placementPolicies";
pub const KEY_ADDRESS: &str = "address";
pub const KEY_LOCATION_MODE: &str = "publicLocationMode";

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

/// Read a text value. Numbers are accepted and stringified (old rows stored
/// `yearEstablished` as a number); anything else reads as absent.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

/// Read a text value with its visibility flag, which defaults to shown
/// only when the value has content.
fn text_with_flag(obj: &Map<String, Value>, key: &str, show_key: &str) -> (Option<String>, bool) {
    let value = text(obj, key);
    let shown = flag(obj, show_key).unwrap_or_else(|| has_text(value.as_deref()));
    (value, shown)
}

/// Read a species field, accepting plural spellings (`"Dogs"`, `"RABBITS"`).
/// Missing or unrecognized values coerce to [`Species::Dog`].
fn species(obj: &Map<String, Value>) -> Species {
    obj.get("species")
        .and_then(Value::as_str)
        .and_then(|s| {
            let s = s.trim();
            Species::parse(s).or_else(|| {
                s.strip_suffix('s')
                    .or_else(|| s.strip_suffix('S'))
                    .and_then(Species::parse)
            })
        })
        .unwrap_or_default()
}

/// Read a list of distinct, non-empty strings, preserving first-seen order.
fn string_set(value: Option<&Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .filter(|s| seen.insert(s.to_string()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// The first of `keys` holding an array.
fn first_array<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Breeds
// ---------------------------------------------------------------------------

/// Read one roster row. Bare strings become public dog breeds.
pub fn breed_from_value(value: &Value) -> Option<BreedEntry> {
    let obj = match value {
        Value::String(name) if !name.trim().is_empty() => {
            return Some(BreedEntry::new(name.clone(), Species::Dog));
        }
        Value::Object(obj) => obj,
        _ => return None,
    };

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())?;
    let species = species(obj);

    let breed_id = obj.get("breedId").and_then(Value::as_i64);
    let custom_breed_id = obj.get("customBreedId").and_then(Value::as_i64);
    let declared = obj
        .get("source")
        .and_then(Value::as_str)
        .and_then(BreedSource::from_str_value);

    // The references decide the source when exactly one is set; the declared
    // source only breaks ties. Only the reference matching the source is kept.
    let source = match (breed_id, custom_breed_id) {
        (Some(_), None) => BreedSource::Canonical,
        (None, Some(_)) => BreedSource::Custom,
        _ => declared.unwrap_or_default(),
    };
    let (breed_id, custom_breed_id) = match source {
        BreedSource::Canonical => (breed_id, None),
        BreedSource::Custom => (None, custom_breed_id),
    };

    Some(BreedEntry {
        name: name.to_string(),
        species,
        breed_id,
        custom_breed_id,
        source,
        is_public: flag(obj, "isPublic").unwrap_or(true),
    })
}

/// Read a roster, dropping malformed rows and later duplicates by identity.
pub fn normalize_breeds(rows: &[Value]) -> Vec<BreedEntry> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(breed_from_value)
        .filter(|b| seen.insert(b.identity()))
        .collect()
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

fn tier_from_value(value: &Value) -> Option<PricingTier> {
    let obj = value.as_object()?;
    Some(PricingTier {
        tier: obj.get("tier").and_then(Value::as_str)?.to_string(),
        price_range: text(obj, "priceRange"),
        description: text(obj, "description"),
    })
}

/// Read one listed program with every optional field defaulted.
pub fn program_from_value(value: &Value) -> Option<ProgramEntry> {
    let obj = match value {
        Value::String(name) if !name.trim().is_empty() => {
            return Some(ProgramEntry::named(name.clone()));
        }
        Value::Object(obj) => obj,
        _ => return None,
    };

    let species = species(obj);
    let cover_image_url = text(obj, "coverImageUrl");
    let whats_included = text(obj, "whatsIncluded");
    let typical_wait_time = text(obj, "typicalWaitTime");

    Some(ProgramEntry {
        name: text(obj, "name").unwrap_or_default(),
        species,
        breed_text: text(obj, "breedText"),
        description: text(obj, "description"),
        program_story: text(obj, "programStory"),
        show_cover_image: flag(obj, "showCoverImage")
            .unwrap_or_else(|| has_text(cover_image_url.as_deref())),
        cover_image_url,
        accept_inquiries: flag(obj, "acceptInquiries").unwrap_or(true),
        open_waitlist: flag(obj, "openWaitlist").unwrap_or(false),
        accept_reservations: flag(obj, "acceptReservations").unwrap_or(false),
        coming_soon: flag(obj, "comingSoon").unwrap_or(false),
        pricing_tiers: obj
            .get("pricingTiers")
            .and_then(Value::as_array)
            .map(|tiers| tiers.iter().filter_map(tier_from_value).collect())
            .unwrap_or_default(),
        show_whats_included: flag(obj, "showWhatsIncluded")
            .unwrap_or_else(|| has_text(whats_included.as_deref())),
        whats_included,
        show_wait_time: flag(obj, "showWaitTime")
            .unwrap_or_else(|| has_text(typical_wait_time.as_deref())),
        typical_wait_time,
    })
}

pub fn normalize_programs(rows: &[Value]) -> Vec<ProgramEntry> {
    rows.iter().filter_map(program_from_value).collect()
}

// ---------------------------------------------------------------------------
// Credentials / policies / address
// ---------------------------------------------------------------------------

/// Category flags default to shown only when the category has items.
pub fn normalize_credentials(raw: Option<&Value>) -> StandardsAndCredentials {
    let empty = Map::new();
    let obj = raw.and_then(Value::as_object).unwrap_or(&empty);

    let mut out = StandardsAndCredentials::default();
    for category in CredentialCategory::ALL {
        let items = string_set(obj.get(category.items_key()));
        let shown = flag(obj, category.show_key()).unwrap_or(!items.is_empty());
        *out.items_mut(category) = items;
        out.set_shown(category, shown);
        out.set_note(category, text(obj, category.note_key()));
    }
    out
}

/// `showPolicies` defaults to shown only when some policy is already enabled.
pub fn normalize_policies(raw: Option<&Value>) -> PlacementPolicies {
    let empty = Map::new();
    let obj = raw.and_then(Value::as_object).unwrap_or(&empty);

    let mut out = PlacementPolicies::default();
    for policy in PolicyFlag::ALL {
        out.set(policy, flag(obj, policy.key()).unwrap_or(false));
    }
    out.show_policies = flag(obj, "showPolicies").unwrap_or_else(|| out.any_enabled());
    out.note = text(obj, "note");
    out
}

pub fn normalize_address(raw: Option<&Value>) -> Address {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return Address::default();
    };
    Address {
        street_address: text(obj, "streetAddress"),
        city: text(obj, "city"),
        state: text(obj, "state"),
        zip: text(obj, "zip"),
        country: text(obj, "country"),
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Normalize a stored profile document into the canonical shape.
///
/// Non-object input yields an empty profile.
pub fn normalize_profile(raw: &Value) -> StorefrontProfile {
    let Some(obj) = raw.as_object() else {
        return StorefrontProfile::default();
    };

    let (business_name, show_business_name) =
        text_with_flag(obj, "businessName", "showBusinessName");
    let (bio, show_bio) = text_with_flag(obj, "bio", "showBio");
    let (year_established, show_year_established) =
        text_with_flag(obj, "yearEstablished", "showYearEstablished");
    let (logo_url, show_logo) = text_with_flag(obj, "logoUrl", "showLogo");
    let (banner_image_url, show_banner) = text_with_flag(obj, "bannerImageUrl", "showBanner");
    let (website_url, show_website) = text_with_flag(obj, "websiteUrl", "showWebsite");
    let (instagram, show_instagram) = text_with_flag(obj, "instagram", "showInstagram");
    let (facebook, show_facebook) = text_with_flag(obj, "facebook", "showFacebook");

    StorefrontProfile {
        business_name,
        show_business_name,
        bio,
        show_bio,
        year_established,
        show_year_established,
        logo_url,
        show_logo,
        banner_image_url,
        show_banner,
        website_url,
        show_website,
        instagram,
        show_instagram,
        facebook,
        show_facebook,
        address: normalize_address(obj.get(KEY_ADDRESS)),
        public_location_mode: obj
            .get(KEY_LOCATION_MODE)
            .and_then(Value::as_str)
            .and_then(LocationMode::from_str_value)
            .unwrap_or_default(),
        breeds: normalize_breeds(first_array(obj, &[KEY_BREEDS, KEY_LISTED_BREEDS])),
        standards_and_credentials: normalize_credentials(obj.get(KEY_STANDARDS)),
        placement_policies: normalize_policies(obj.get(KEY_POLICIES)),
        listed_programs: normalize_programs(first_array(
            obj,
            &[KEY_LISTED_PROGRAMS, KEY_PROGRAMS],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renormalize(profile: &StorefrontProfile) -> StorefrontProfile {
        normalize_profile(&serde_json::to_value(profile).unwrap())
    }

    // -- breeds ---------------------------------------------------------------

    #[test]
    fn bare_string_breed_becomes_public_dog() {
        let profile = normalize_profile(&json!({ "breeds": ["Labrador"] }));
        assert_eq!(profile.breeds, vec![BreedEntry::new("Labrador", Species::Dog)]);
    }

    #[test]
    fn breed_species_is_title_cased_and_defaulted() {
        let profile = normalize_profile(&json!({
            "breeds": [
                { "name": "Maine Coon", "species": "CAT" },
                { "name": "Beagle" },
            ]
        }));
        assert_eq!(profile.breeds[0].species, Species::Cat);
        assert_eq!(profile.breeds[1].species, Species::Dog);
        assert!(profile.breeds.iter().all(|b| b.is_public));
    }

    #[test]
    fn explicit_breed_visibility_is_kept() {
        let profile = normalize_profile(&json!({
            "breeds": [{ "name": "Beagle", "species": "Dog", "isPublic": false }]
        }));
        assert!(!profile.breeds[0].is_public);
    }

    #[test]
    fn listed_breeds_alias_is_accepted() {
        let profile = normalize_profile(&json!({ "listedBreeds": ["Poodle"] }));
        assert_eq!(profile.breeds.len(), 1);
        assert_eq!(profile.breeds[0].name, "Poodle");
    }

    #[test]
    fn canonical_breeds_key_wins_over_alias() {
        let profile = normalize_profile(&json!({
            "breeds": ["Poodle"],
            "listedBreeds": ["Beagle", "Boxer"],
        }));
        assert_eq!(profile.breeds.len(), 1);
        assert_eq!(profile.breeds[0].name, "Poodle");
    }

    #[test]
    fn malformed_breed_rows_are_dropped() {
        let profile = normalize_profile(&json!({
            "breeds": [null, 42, "", { "species": "Dog" }, { "name": "  " }, "Boxer"]
        }));
        assert_eq!(profile.breeds.len(), 1);
        assert_eq!(profile.breeds[0].name, "Boxer");
    }

    #[test]
    fn unknown_species_keeps_the_row() {
        let profile = normalize_profile(&json!({
            "breeds": [
                { "name": "Holland Lop", "species": "RABBITS" },
                { "name": "Beagle", "species": "Dogs" },
                { "name": "Parrot", "species": "Bird" },
                { "name": "Mutt", "species": 7 }
            ],
            "listedPrograms": [{ "name": "Lops", "breedText": "Holland Lop", "species": "Bunny" }]
        }));

        let species: Vec<(&str, Species)> = profile
            .breeds
            .iter()
            .map(|b| (b.name.as_str(), b.species))
            .collect();
        assert_eq!(
            species,
            vec![
                ("Holland Lop", Species::Rabbit),
                ("Beagle", Species::Dog),
                ("Parrot", Species::Dog),
                ("Mutt", Species::Dog),
            ]
        );
        assert_eq!(profile.listed_programs.len(), 1);
        assert_eq!(profile.listed_programs[0].species, Species::Dog);
        assert_eq!(normalize_profile(&serde_json::to_value(&profile).unwrap()), profile);
    }

    #[test]
    fn kept_rows_stay_under_the_removal_guard() {
        let profile = normalize_profile(&json!({
            "breeds": [{ "name": "Holland Lop", "species": "RABBITS" }]
        }));
        let refs = crate::roster::BreedingProgramRefs::new(["holland lop"]);
        let check = crate::roster::can_remove_breed(&profile, "Holland Lop", &refs, true);
        assert!(!check.allowed);
    }

    #[test]
    fn duplicate_breeds_collapse_to_first() {
        let profile = normalize_profile(&json!({
            "breeds": [
                { "name": "Labrador", "species": "Dog", "isPublic": false },
                "labrador",
                { "name": "Labrador", "species": "Cat" },
            ]
        }));
        assert_eq!(profile.breeds.len(), 2);
        assert!(!profile.breeds[0].is_public);
        assert_eq!(profile.breeds[1].species, Species::Cat);
    }

    #[test]
    fn breed_source_follows_references() {
        let profile = normalize_profile(&json!({
            "breeds": [
                { "name": "Labrador", "breedId": 12 },
                { "name": "Mini Doodle", "customBreedId": 4, "source": "canonical" },
                { "name": "Boxer", "source": "custom" },
            ]
        }));
        assert_eq!(profile.breeds[0].source, BreedSource::Canonical);
        assert_eq!(profile.breeds[0].breed_id, Some(12));
        assert_eq!(profile.breeds[1].source, BreedSource::Custom);
        assert_eq!(profile.breeds[1].custom_breed_id, Some(4));
        assert_eq!(profile.breeds[2].source, BreedSource::Custom);
        assert_eq!(profile.breeds[2].custom_breed_id, None);
    }

    #[test]
    fn conflicting_references_keep_the_declared_one() {
        let profile = normalize_profile(&json!({
            "breeds": [{ "name": "Boxer", "breedId": 1, "customBreedId": 2, "source": "custom" }]
        }));
        let breed = &profile.breeds[0];
        assert_eq!(breed.source, BreedSource::Custom);
        assert_eq!(breed.breed_id, None);
        assert_eq!(breed.custom_breed_id, Some(2));
    }

    // -- programs -------------------------------------------------------------

    #[test]
    fn bare_string_program_gets_listing_defaults() {
        let profile = normalize_profile(&json!({ "programs": ["Spring Litter"] }));
        let program = &profile.listed_programs[0];
        assert_eq!(program.name, "Spring Litter");
        assert_eq!(program.species, Species::Dog);
        assert!(program.accept_inquiries);
        assert!(!program.open_waitlist);
        assert!(!program.coming_soon);
        assert_eq!(program.breed_text, None);
    }

    #[test]
    fn program_object_fields_are_defaulted() {
        let profile = normalize_profile(&json!({
            "listedPrograms": [{
                "name": "Goldens",
                "species": "DOG",
                "breedText": "Golden Retriever",
                "coverImageUrl": "https://cdn.example/cover.jpg",
                "pricingTiers": [{ "tier": "Pet", "priceRange": "$2,500" }, { "bad": true }],
            }]
        }));
        let program = &profile.listed_programs[0];
        assert!(program.show_cover_image);
        assert!(!program.show_whats_included);
        assert!(!program.show_wait_time);
        assert!(program.accept_inquiries);
        assert!(!program.accept_reservations);
        assert_eq!(program.pricing_tiers.len(), 1);
        assert_eq!(program.pricing_tiers[0].price_range.as_deref(), Some("$2,500"));
    }

    #[test]
    fn nameless_program_objects_are_kept() {
        let profile = normalize_profile(&json!({
            "listedPrograms": [{ "breedText": "Boxer" }, null]
        }));
        assert_eq!(profile.listed_programs.len(), 1);
        assert_eq!(profile.listed_programs[0].name, "");
        assert!(!profile.listed_programs[0].is_public_eligible());
    }

    // -- credentials / policies ----------------------------------------------

    #[test]
    fn credential_flags_default_from_content() {
        let profile = normalize_profile(&json!({
            "standardsAndCredentials": {
                "registrations": ["AKC", "AKC", "UKC"],
                "healthPractices": [],
                "showCarePractices": true,
            }
        }));
        let creds = &profile.standards_and_credentials;
        assert_eq!(creds.registrations, vec!["AKC", "UKC"]);
        assert!(creds.show_registrations);
        assert!(!creds.show_health_practices);
        assert!(!creds.show_breeding_practices);
        assert!(creds.show_care_practices);
    }

    #[test]
    fn show_policies_defaults_from_enabled_flags() {
        let hidden = normalize_profile(&json!({
            "placementPolicies": { "requireContract": false }
        }));
        assert!(!hidden.placement_policies.show_policies);

        let shown = normalize_profile(&json!({ "placementPolicies": { "healthGuarantee": true } }));
        assert!(shown.placement_policies.show_policies);

        let explicit = normalize_profile(&json!({
            "placementPolicies": { "healthGuarantee": true, "showPolicies": false }
        }));
        assert!(!explicit.placement_policies.show_policies);
    }

    // -- top level ------------------------------------------------------------

    #[test]
    fn text_flags_default_from_content() {
        let profile = normalize_profile(&json!({
            "businessName": "Acme Kennels",
            "bio": "",
            "logoUrl": "https://cdn.example/logo.png",
            "showLogo": false,
            "yearEstablished": 1998,
        }));
        assert!(profile.show_business_name);
        assert!(!profile.show_bio);
        assert!(!profile.show_logo);
        assert_eq!(profile.year_established.as_deref(), Some("1998"));
        assert!(profile.show_year_established);
        assert!(!profile.show_website);
    }

    #[test]
    fn location_mode_defaults_to_hidden() {
        assert_eq!(normalize_profile(&json!({})).public_location_mode, LocationMode::Hidden);
        let profile = normalize_profile(&json!({ "publicLocationMode": "city_state" }));
        assert_eq!(profile.public_location_mode, LocationMode::CityState);
        let profile = normalize_profile(&json!({ "publicLocationMode": "everywhere" }));
        assert_eq!(profile.public_location_mode, LocationMode::Hidden);
    }

    #[test]
    fn non_object_input_yields_empty_profile() {
        assert_eq!(normalize_profile(&json!(null)), StorefrontProfile::default());
        assert_eq!(normalize_profile(&json!(["Labrador"])), StorefrontProfile::default());
    }

    // -- idempotency ----------------------------------------------------------

    #[test]
    fn normalization_is_idempotent() {
        let fixtures = vec![
            json!({}),
            json!({ "businessName": "Acme", "breeds": ["Labrador"] }),
            json!({
                "businessName": "Acme",
                "showBusinessName": false,
                "listedBreeds": [
                    "Beagle",
                    { "name": "Maine Coon", "species": "CAT", "isPublic": false }
                ],
                "programs": [
                    "Spring",
                    { "name": "Fall", "breedText": "Beagle", "typicalWaitTime": "6 months" }
                ],
                "address": { "city": "Austin", "state": "TX", "zip": 78701 },
                "publicLocationMode": "zip_only",
                "standardsAndCredentials": {
                    "registrations": ["AKC"],
                    "carePracticesNote": "Raised indoors"
                },
                "placementPolicies": { "requireDeposit": true, "note": "Deposits are refundable" },
            }),
        ];
        for raw in fixtures {
            let once = normalize_profile(&raw);
            assert_eq!(renormalize(&once), once, "not idempotent for {raw}");
        }
    }
}
