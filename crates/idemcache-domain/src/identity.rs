//! Deterministic content hashing for payloads.
//!
//! The canonical serialization is order-preserving: `items_a` is hashed
//! before `items_b` because list assignment is semantically significant
//! (swapping the lists is a different payload). Every list and element is
//! length-prefixed so element boundaries are unambiguous -- `["ab", "c"]`
//! and `["a", "bc"]` digest differently.

use sha2::{Digest, Sha256};

use crate::payload::{Payload, PayloadId};

impl PayloadId {
    /// Computes the identifier for a payload.
    ///
    /// Total function: any payload hashes, regardless of whether it would
    /// pass transformer validation. Identical content always yields the
    /// identical identifier.
    pub fn from_payload(payload: &Payload) -> Self {
        let mut hasher = Sha256::new();
        hash_list(&mut hasher, b"items_a", &payload.items_a);
        hash_list(&mut hasher, b"items_b", &payload.items_b);
        Self::from_digest(hex::encode(hasher.finalize()))
    }
}

fn hash_list(hasher: &mut Sha256, tag: &[u8], items: &[String]) {
    hasher.update(tag);
    hasher.update((items.len() as u64).to_le_bytes());
    for item in items {
        hasher.update((item.len() as u64).to_le_bytes());
        hasher.update(item.as_bytes());
    }
}
