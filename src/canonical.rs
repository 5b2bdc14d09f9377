//! Canonical serialization and content hashing for raw payloads
//!
//! Every fetched record is reduced to a deterministic byte form before
//! hashing so that retries and overlapping runs produce the same digest
//! for the same content, regardless of the field order the upstream
//! happened to emit.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A parsed record: flat mapping of field name to string value.
///
/// A `BTreeMap` keeps the keys sorted, so two payloads with identical
/// content built in different insertion orders are the same value.
pub type Payload = BTreeMap<String, String>;

/// Produces the canonical serialization of a payload.
///
/// The canonical form is compact JSON with keys in ascending order and
/// non-ASCII text preserved as-is. It is used solely as the hash input
/// and as the lossless `raw_payload` column value.
pub fn canonical_form(payload: &Payload) -> String {
    // A string-to-string map always serializes.
    serde_json::to_string(payload).expect("payload map serializes to JSON")
}

/// Computes the SHA-256 digest of a payload's canonical form.
///
/// Returns a 64-character lowercase hex string. This is the dedup key
/// for the raw store: field-for-field identical content always hashes
/// identically, and any difference in field set or values yields a
/// different digest.
pub fn payload_hash(payload: &Payload) -> String {
    let canonical = canonical_form(payload);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
