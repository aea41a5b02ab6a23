//! Draft / published snapshot merging.
//!
//! The editor is seeded from two independently stored documents. Draft
//! fields win at the top level; every field the draft does not carry falls
//! through to the published document, so a draft that only touched the bio
//! still shows the full published profile.

use serde_json::{Map, Value};

use crate::normalize::{
    normalize_profile, KEY_BREEDS, KEY_LISTED_BREEDS, KEY_LISTED_PROGRAMS, KEY_PROGRAMS,
};
use crate::profile::StorefrontProfile;

/// Legacy top-level keys and the canonical key each one stands in for.
const KEY_ALIASES: &[(&str, &str)] = &[
    (KEY_LISTED_BREEDS, KEY_BREEDS),
    (KEY_PROGRAMS, KEY_LISTED_PROGRAMS),
];

/// Copy a stored document's top-level fields, moving aliased collections
/// under their canonical key so the two snapshots compete on the same key.
fn canonical_fields(doc: Option<&Value>) -> Map<String, Value> {
    let mut fields = doc
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for (alias, canonical) in KEY_ALIASES {
        let canonical_is_array = fields.get(*canonical).is_some_and(Value::is_array);
        if let Some(value) = fields.remove(*alias) {
            if !canonical_is_array {
                fields.insert((*canonical).to_string(), value);
            }
        }
    }
    fields
}

/// Shallow-merge two stored documents. Keys present in `draft` (even when
/// `null`) replace the published value.
pub fn merge_documents(published: Option<&Value>, draft: Option<&Value>) -> Value {
    let mut merged = canonical_fields(published);
    merged.extend(canonical_fields(draft));
    Value::Object(merged)
}

/// Build the editable profile from the stored snapshots.
pub fn merge_snapshots(published: Option<&Value>, draft: Option<&Value>) -> StorefrontProfile {
    normalize_profile(&merge_documents(published, draft))
}
