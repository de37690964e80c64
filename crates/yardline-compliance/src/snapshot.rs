//! Equipment snapshot fingerprints.
//!
//! A fingerprint identifies the inputs of a derivation pass: the tenant's
//! equipment and the evaluation date. Equal fingerprints mean the stored
//! alert set is still current.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use yardline_core::models::equipment::Equipment;

use crate::error::ComplianceError;

#[derive(Serialize)]
struct Canonical<'a> {
    date: NaiveDate,
    equipment: Vec<&'a Equipment>,
}

/// SHA-256 over the canonical JSON of the id-sorted equipment and `today`,
/// base64url encoded.
pub fn fingerprint(equipment: &[Equipment], today: NaiveDate) -> Result<String, ComplianceError> {
    let mut sorted: Vec<&Equipment> = equipment.iter().collect();
    sorted.sort_by_key(|e| e.id);

    let bytes = serde_json::to_vec(&Canonical {
        date: today,
        equipment: sorted,
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(URL_SAFE_NO_PAD.encode(digest))
}
