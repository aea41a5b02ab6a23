//! Canonical storefront profile model.
//!
//! These types describe the current shape of a breeder's storefront profile
//! as it is edited in the portal and persisted by the platform, both as the
//! `draft` and the `published` snapshot. Field names serialize in camelCase
//! to match the stored JSON documents. Older rows that predate this shape go
//! through [`crate::normalize`] before they are turned into these types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length (in characters) of a per-category credential note.
pub const MAX_CREDENTIAL_NOTE_LENGTH: usize = 200;

/// Maximum length (in characters) of the placement policies note.
pub const MAX_POLICIES_NOTE_LENGTH: usize = 300;

/// Returns `true` when an optional text value holds visible content.
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Truncate `value` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Animal species supported by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Species {
    #[default]
    Dog,
    Cat,
    Horse,
    Goat,
    Sheep,
    Rabbit,
}

impl Species {
    /// All supported species in display order.
    pub const ALL: [Species; 6] = [
        Self::Dog,
        Self::Cat,
        Self::Horse,
        Self::Goat,
        Self::Sheep,
        Self::Rabbit,
    ];

    /// Title-case name, used for breed entries (`"Dog"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "Dog",
            Self::Cat => "Cat",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Sheep => "Sheep",
            Self::Rabbit => "Rabbit",
        }
    }

    /// Upper-case name, used for program entries (`"DOG"`).
    pub fn as_upper_str(self) -> &'static str {
        match self {
            Self::Dog => "DOG",
            Self::Cat => "CAT",
            Self::Horse => "HORSE",
            Self::Goat => "GOAT",
            Self::Sheep => "SHEEP",
            Self::Rabbit => "RABBIT",
        }
    }

    /// Parse a species name case-insensitively. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Species {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Species {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Species::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown species '{raw}'")))
    }
}

/// Serde adapter writing a [`Species`] in upper case, as program rows store it.
pub mod species_upper {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Species;

    pub fn serialize<S: Serializer>(species: &Species, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(species.as_upper_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Species, D::Error> {
        Species::deserialize(deserializer)
    }
}

// ---------------------------------------------------------------------------
// Breeds
// ---------------------------------------------------------------------------

/// Where a roster breed is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedSource {
    /// Platform-wide breed registry.
    #[default]
    Canonical,
    /// Tenant-defined breed.
    Custom,
}

impl BreedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Custom => "custom",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "canonical" => Some(Self::Canonical),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Deduplication key of a roster breed: lower-cased name plus species.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreedIdentity {
    pub name: String,
    pub species: Species,
}

/// One breed on the storefront roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreedEntry {
    pub name: String,
    pub species: Species,
    /// Canonical registry reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_id: Option<i64>,
    /// Tenant-defined breed reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_breed_id: Option<i64>,
    pub source: BreedSource,
    pub is_public: bool,
}

impl BreedEntry {
    /// A public canonical breed with no registry reference yet.
    pub fn new(name: impl Into<String>, species: Species) -> Self {
        Self {
            name: name.into(),
            species,
            breed_id: None,
            custom_breed_id: None,
            source: BreedSource::Canonical,
            is_public: true,
        }
    }

    /// A public breed backed by the canonical registry.
    pub fn canonical(name: impl Into<String>, species: Species, breed_id: i64) -> Self {
        Self {
            breed_id: Some(breed_id),
            ..Self::new(name, species)
        }
    }

    /// A public breed backed by a tenant-defined breed.
    pub fn custom(name: impl Into<String>, species: Species, custom_breed_id: i64) -> Self {
        Self {
            custom_breed_id: Some(custom_breed_id),
            source: BreedSource::Custom,
            ..Self::new(name, species)
        }
    }

    pub fn identity(&self) -> BreedIdentity {
        BreedIdentity {
            name: self.name.trim().to_lowercase(),
            species: self.species,
        }
    }
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

/// A pricing tier advertised by a listed program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub tier: String,
    pub price_range: Option<String>,
    pub description: Option<String>,
}

/// A breeding program listed on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    pub name: String,
    #[serde(with = "species_upper")]
    pub species: Species,
    pub breed_text: Option<String>,
    pub description: Option<String>,
    pub program_story: Option<String>,
    pub cover_image_url: Option<String>,
    pub show_cover_image: bool,
    pub accept_inquiries: bool,
    pub open_waitlist: bool,
    pub accept_reservations: bool,
    pub coming_soon: bool,
    pub pricing_tiers: Vec<PricingTier>,
    pub whats_included: Option<String>,
    pub show_whats_included: bool,
    pub typical_wait_time: Option<String>,
    pub show_wait_time: bool,
}

impl ProgramEntry {
    /// A program with only a name, carrying the listing defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: Species::Dog,
            breed_text: None,
            description: None,
            program_story: None,
            cover_image_url: None,
            show_cover_image: false,
            accept_inquiries: true,
            open_waitlist: false,
            accept_reservations: false,
            coming_soon: false,
            pricing_tiers: Vec::new(),
            whats_included: None,
            show_whats_included: false,
            typical_wait_time: None,
            show_wait_time: false,
        }
    }

    /// A program is listed publicly only once it has both a name and a breed.
    pub fn is_public_eligible(&self) -> bool {
        has_text(Some(&self.name)) && has_text(self.breed_text.as_deref())
    }

    /// Case-insensitive match of this program's breed text against a breed name.
    pub fn references_breed(&self, breed_name: &str) -> bool {
        self.breed_text
            .as_deref()
            .is_some_and(|text| text.trim().to_lowercase() == breed_name.trim().to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Address / location
// ---------------------------------------------------------------------------

/// Postal address. Never exposed publicly in raw form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// How much of the address the public storefront reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    #[default]
    Hidden,
    ZipOnly,
    CityState,
    Full,
}

impl LocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::ZipOnly => "zip_only",
            Self::CityState => "city_state",
            Self::Full => "full",
        }
    }

    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "hidden" => Some(Self::Hidden),
            "zip_only" => Some(Self::ZipOnly),
            "city_state" => Some(Self::CityState),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Standards & credentials
// ---------------------------------------------------------------------------

/// The four credential categories shown on a storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialCategory {
    Registrations,
    HealthPractices,
    BreedingPractices,
    CarePractices,
}

impl CredentialCategory {
    pub const ALL: [CredentialCategory; 4] = [
        Self::Registrations,
        Self::HealthPractices,
        Self::BreedingPractices,
        Self::CarePractices,
    ];

    /// JSON key of the item list.
    pub fn items_key(self) -> &'static str {
        match self {
            Self::Registrations => "registrations",
            Self::HealthPractices => "healthPractices",
            Self::BreedingPractices => "breedingPractices",
            Self::CarePractices => "carePractices",
        }
    }

    /// JSON key of the visibility flag.
    pub fn show_key(self) -> &'static str {
        match self {
            Self::Registrations => "showRegistrations",
            Self::HealthPractices => "showHealthPractices",
            Self::BreedingPractices => "showBreedingPractices",
            Self::CarePractices => "showCarePractices",
        }
    }

    /// JSON key of the free-text note.
    pub fn note_key(self) -> &'static str {
        match self {
            Self::Registrations => "registrationsNote",
            Self::HealthPractices => "healthPracticesNote",
            Self::BreedingPractices => "breedingPracticesNote",
            Self::CarePractices => "carePracticesNote",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Registrations => "Registrations & Affiliations",
            Self::HealthPractices => "Health Practices",
            Self::BreedingPractices => "Breeding Practices",
            Self::CarePractices => "Care Practices",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardsAndCredentials {
    pub registrations: Vec<String>,
    pub show_registrations: bool,
    pub registrations_note: Option<String>,
    pub health_practices: Vec<String>,
    pub show_health_practices: bool,
    pub health_practices_note: Option<String>,
    pub breeding_practices: Vec<String>,
    pub show_breeding_practices: bool,
    pub breeding_practices_note: Option<String>,
    pub care_practices: Vec<String>,
    pub show_care_practices: bool,
    pub care_practices_note: Option<String>,
}

impl StandardsAndCredentials {
    pub fn items(&self, category: CredentialCategory) -> &[String] {
        match category {
            CredentialCategory::Registrations => &self.registrations,
            CredentialCategory::HealthPractices => &self.health_practices,
            CredentialCategory::BreedingPractices => &self.breeding_practices,
            CredentialCategory::CarePractices => &self.care_practices,
        }
    }

    pub fn items_mut(&mut self, category: CredentialCategory) -> &mut Vec<String> {
        match category {
            CredentialCategory::Registrations => &mut self.registrations,
            CredentialCategory::HealthPractices => &mut self.health_practices,
            CredentialCategory::BreedingPractices => &mut self.breeding_practices,
            CredentialCategory::CarePractices => &mut self.care_practices,
        }
    }

    pub fn is_shown(&self, category: CredentialCategory) -> bool {
        match category {
            CredentialCategory::Registrations => self.show_registrations,
            CredentialCategory::HealthPractices => self.show_health_practices,
            CredentialCategory::BreedingPractices => self.show_breeding_practices,
            CredentialCategory::CarePractices => self.show_care_practices,
        }
    }

    pub fn set_shown(&mut self, category: CredentialCategory, show: bool) {
        let flag = match category {
            CredentialCategory::Registrations => &mut self.show_registrations,
            CredentialCategory::HealthPractices => &mut self.show_health_practices,
            CredentialCategory::BreedingPractices => &mut self.show_breeding_practices,
            CredentialCategory::CarePractices => &mut self.show_care_practices,
        };
        *flag = show;
    }

    pub fn note(&self, category: CredentialCategory) -> Option<&str> {
        match category {
            CredentialCategory::Registrations => self.registrations_note.as_deref(),
            CredentialCategory::HealthPractices => self.health_practices_note.as_deref(),
            CredentialCategory::BreedingPractices => self.breeding_practices_note.as_deref(),
            CredentialCategory::CarePractices => self.care_practices_note.as_deref(),
        }
    }

    pub fn set_note(&mut self, category: CredentialCategory, note: Option<String>) {
        let slot = match category {
            CredentialCategory::Registrations => &mut self.registrations_note,
            CredentialCategory::HealthPractices => &mut self.health_practices_note,
            CredentialCategory::BreedingPractices => &mut self.breeding_practices_note,
            CredentialCategory::CarePractices => &mut self.care_practices_note,
        };
        *slot = note;
    }
}

// ---------------------------------------------------------------------------
// Placement policies
// ---------------------------------------------------------------------------

/// Requirement and commitment flags a breeder can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyFlag {
    RequireApplication,
    RequireInterview,
    RequireContract,
    RequireDeposit,
    RequireReservationFee,
    RequireHomeVisit,
    RequireVetReference,
    RequireSpayNeuter,
    HealthGuarantee,
    ReturnPolicy,
    LifetimeTakeBack,
    OngoingSupport,
}

impl PolicyFlag {
    pub const ALL: [PolicyFlag; 12] = [
        Self::RequireApplication,
        Self::RequireInterview,
        Self::RequireContract,
        Self::RequireDeposit,
        Self::RequireReservationFee,
        Self::RequireHomeVisit,
        Self::RequireVetReference,
        Self::RequireSpayNeuter,
        Self::HealthGuarantee,
        Self::ReturnPolicy,
        Self::LifetimeTakeBack,
        Self::OngoingSupport,
    ];

    /// JSON key inside `placementPolicies`.
    pub fn key(self) -> &'static str {
        match self {
            Self::RequireApplication => "requireApplication",
            Self::RequireInterview => "requireInterview",
            Self::RequireContract => "requireContract",
            Self::RequireDeposit => "requireDeposit",
            Self::RequireReservationFee => "requireReservationFee",
            Self::RequireHomeVisit => "requireHomeVisit",
            Self::RequireVetReference => "requireVetReference",
            Self::RequireSpayNeuter => "requireSpayNeuter",
            Self::HealthGuarantee => "healthGuarantee",
            Self::ReturnPolicy => "returnPolicy",
            Self::LifetimeTakeBack => "lifetimeTakeBack",
            Self::OngoingSupport => "ongoingSupport",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RequireApplication => "Application required",
            Self::RequireInterview => "Interview required",
            Self::RequireContract => "Signed contract required",
            Self::RequireDeposit => "Deposit required",
            Self::RequireReservationFee => "Reservation fee required",
            Self::RequireHomeVisit => "Home visit required",
            Self::RequireVetReference => "Veterinary reference required",
            Self::RequireSpayNeuter => "Spay/neuter agreement required",
            Self::HealthGuarantee => "Health guarantee",
            Self::ReturnPolicy => "Return policy",
            Self::LifetimeTakeBack => "Lifetime take-back",
            Self::OngoingSupport => "Ongoing breeder support",
        }
    }

    /// The flag that cannot be enabled together with this one, if any.
    pub fn exclusive_with(self) -> Option<PolicyFlag> {
        match self {
            Self::RequireDeposit => Some(Self::RequireReservationFee),
            Self::RequireReservationFee => Some(Self::RequireDeposit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPolicies {
    pub require_application: bool,
    pub require_interview: bool,
    pub require_contract: bool,
    pub require_deposit: bool,
    pub require_reservation_fee: bool,
    pub require_home_visit: bool,
    pub require_vet_reference: bool,
    pub require_spay_neuter: bool,
    pub health_guarantee: bool,
    pub return_policy: bool,
    pub lifetime_take_back: bool,
    pub ongoing_support: bool,
    pub show_policies: bool,
    pub note: Option<String>,
}

impl PlacementPolicies {
    fn slot(&mut self, flag: PolicyFlag) -> &mut bool {
        match flag {
            PolicyFlag::RequireApplication => &mut self.require_application,
            PolicyFlag::RequireInterview => &mut self.require_interview,
            PolicyFlag::RequireContract => &mut self.require_contract,
            PolicyFlag::RequireDeposit => &mut self.require_deposit,
            PolicyFlag::RequireReservationFee => &mut self.require_reservation_fee,
            PolicyFlag::RequireHomeVisit => &mut self.require_home_visit,
            PolicyFlag::RequireVetReference => &mut self.require_vet_reference,
            PolicyFlag::RequireSpayNeuter => &mut self.require_spay_neuter,
            PolicyFlag::HealthGuarantee => &mut self.health_guarantee,
            PolicyFlag::ReturnPolicy => &mut self.return_policy,
            PolicyFlag::LifetimeTakeBack => &mut self.lifetime_take_back,
            PolicyFlag::OngoingSupport => &mut self.ongoing_support,
        }
    }

    pub fn get(&self, flag: PolicyFlag) -> bool {
        match flag {
            PolicyFlag::RequireApplication => self.require_application,
            PolicyFlag::RequireInterview => self.require_interview,
            PolicyFlag::RequireContract => self.require_contract,
            PolicyFlag::RequireDeposit => self.require_deposit,
            PolicyFlag::RequireReservationFee => self.require_reservation_fee,
            PolicyFlag::RequireHomeVisit => self.require_home_visit,
            PolicyFlag::RequireVetReference => self.require_vet_reference,
            PolicyFlag::RequireSpayNeuter => self.require_spay_neuter,
            PolicyFlag::HealthGuarantee => self.health_guarantee,
            PolicyFlag::ReturnPolicy => self.return_policy,
            PolicyFlag::LifetimeTakeBack => self.lifetime_take_back,
            PolicyFlag::OngoingSupport => self.ongoing_support,
        }
    }

    /// Set a single flag without touching any other flag.
    pub fn set(&mut self, flag: PolicyFlag, enabled: bool) {
        *self.slot(flag) = enabled;
    }

    pub fn any_enabled(&self) -> bool {
        PolicyFlag::ALL.into_iter().any(|f| self.get(f))
    }

    pub fn enabled(&self) -> Vec<PolicyFlag> {
        PolicyFlag::ALL.into_iter().filter(|f| self.get(*f)).collect()
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The editable storefront profile (one shape for both draft and published).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProfile {
    pub business_name: Option<String>,
    pub show_business_name: bool,
    pub bio: Option<String>,
    pub show_bio: bool,
    pub year_established: Option<String>,
    pub show_year_established: bool,
    pub logo_url: Option<String>,
    pub show_logo: bool,
    pub banner_image_url: Option<String>,
    pub show_banner: bool,
    pub website_url: Option<String>,
    pub show_website: bool,
    pub instagram: Option<String>,
    pub show_instagram: bool,
    pub facebook: Option<String>,
    pub show_facebook: bool,
    pub address: Address,
    pub public_location_mode: LocationMode,
    pub breeds: Vec<BreedEntry>,
    pub standards_and_credentials: StandardsAndCredentials,
    pub placement_policies: PlacementPolicies,
    pub listed_programs: Vec<ProgramEntry>,
}

impl StorefrontProfile {
    /// Index of the roster breed sharing `entry`'s identity, if any.
    pub fn find_breed(&self, entry: &BreedEntry) -> Option<usize> {
        let wanted = entry.identity();
        self.breeds.iter().position(|b| b.identity() == wanted)
    }

    /// First public-eligible program whose breed text names `breed_name`.
    pub fn public_program_for_breed(&self, breed_name: &str) -> Option<&ProgramEntry> {
        self.listed_programs
            .iter()
            .find(|p| p.is_public_eligible() && p.references_breed(breed_name))
    }
}
