//! Payload and identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A create request payload: two equal-length lists of strings.
///
/// The pairing is positional (`items_a[i]` interleaves with `items_b[i]`)
/// and the field order is semantically significant. Payloads are value
/// types; no component ever mutates one after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub items_a: Vec<String>,
    pub items_b: Vec<String>,
}

impl Payload {
    /// Creates a new payload from the two lists.
    pub fn new(items_a: Vec<String>, items_b: Vec<String>) -> Self {
        Self { items_a, items_b }
    }
}

/// Content-derived identifier for a payload.
///
/// Always the 64-character lowercase hex encoding of a SHA-256 digest over
/// the payload's canonical serialization (see [`PayloadId::from_payload`]).
/// Identical payload content yields the identical identifier; the digest is
/// the primary key for all cache lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadId(String);

impl PayloadId {
    /// Length of the hex-encoded digest.
    pub const LEN: usize = 64;

    /// Parses an identifier from its wire representation.
    ///
    /// Rejects anything that is not exactly 64 lowercase hex characters, so
    /// malformed read requests fail before any store round trip.
    pub fn parse(value: &str) -> DomainResult<Self> {
        let well_formed = value.len() == Self::LEN
            && value
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::InvalidIdentifier {
                value: value.to_string(),
            })
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a freshly computed hex digest. Internal to the hasher.
    pub(crate) fn from_digest(digest: String) -> Self {
        debug_assert_eq!(digest.len(), Self::LEN);
        Self(digest)
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
