//! Unsaved-change detection.
//!
//! The tracker keeps the last persisted snapshot (the merge result on load,
//! then whatever was last saved or published) and compares the live form
//! state against it structurally. Comparison goes through a canonical JSON
//! rendering with object keys sorted at every depth, hashed with SHA-256, so
//! key order never produces a false positive while sequence order still
//! counts. No normalization happens before comparing.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::profile::StorefrontProfile;

/// Re-build `value` with object keys inserted in sorted order at every depth.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// SHA-256 hex digest of the canonical JSON rendering of `value`.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, CoreError> {
    let json = serde_json::to_value(value)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize snapshot: {e}")))?;
    let bytes = serde_json::to_vec(&canonicalize(&json))
        .map_err(|e| CoreError::Internal(format!("Failed to render snapshot: {e}")))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Tracks the last persisted snapshot of a storefront profile.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    baseline: StorefrontProfile,
    baseline_fingerprint: String,
}

impl ChangeTracker {
    /// Start tracking with `baseline` as the persisted state.
    pub fn new(baseline: StorefrontProfile) -> Result<Self, CoreError> {
        let baseline_fingerprint = fingerprint(&baseline)?;
        Ok(Self {
            baseline,
            baseline_fingerprint,
        })
    }

    pub fn baseline(&self) -> &StorefrontProfile {
        &self.baseline
    }

    /// Replace the baseline after a confirmed save or publish.
    pub fn reset(&mut self, baseline: StorefrontProfile) -> Result<(), CoreError> {
        self.baseline_fingerprint = fingerprint(&baseline)?;
        self.baseline = baseline;
        Ok(())
    }

    /// Whether `live` differs from the baseline.
    ///
    /// A snapshot that cannot be fingerprinted counts as changed.
    pub fn has_changes(&self, live: &StorefrontProfile) -> bool {
        match fingerprint(live) {
            Ok(fp) => fp != self.baseline_fingerprint,
            Err(_) => true,
        }
    }
}
