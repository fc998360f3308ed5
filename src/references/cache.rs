//! Persisted form of an answer's resolved references.
//!
//! Stored as a JSON array of question ids (not display numbers) in ascending
//! order, or null when references were never computed. The column is only an
//! index: a missing or unreadable value forces re-derivation and is never an
//! error.

use std::collections::BTreeSet;

use tracing::warn;

use crate::store::QuestionId;

/// Serializes ids as an ascending JSON list.
pub fn encode_reference_ids(ids: &BTreeSet<QuestionId>) -> String {
    let ordered: Vec<QuestionId> = ids.iter().copied().collect();
    serde_json::to_string(&ordered).unwrap_or_else(|_| "[]".to_string())
}

/// Reads a stored id list. Null and malformed payloads both yield `None`.
pub fn decode_reference_ids(raw: Option<&str>) -> Option<BTreeSet<QuestionId>> {
    let raw = raw?;
    match serde_json::from_str::<Vec<QuestionId>>(raw) {
        Ok(ids) => Some(ids.into_iter().collect()),
        Err(e) => {
            warn!(error = %e, raw_len = raw.len(), "Unreadable reference cache; treating as empty");
            None
        }
    }
}
