//! Payload transformation: interleave, normalize, upper-case.
//!
//! The transformer is the pure function the cache guards. It re-validates
//! shape and size limits itself, independent of any checks the API layer
//! performs.

use crate::error::{DomainError, DomainResult};
use crate::payload::Payload;

/// Size limits enforced by the transformer.
///
/// Per-item length and the total output cap are measured in characters
/// after whitespace normalization.
#[derive(Debug, Clone)]
pub struct TransformLimits {
    /// Maximum number of elements per list.
    pub max_items: usize,
    /// Maximum length of a single normalized element.
    pub max_item_chars: usize,
    /// Maximum length of the joined output.
    pub max_output_chars: usize,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            max_items: 100_000,
            max_item_chars: 8_192,
            max_output_chars: 5_000_000,
        }
    }
}

impl TransformLimits {
    /// Sets the per-list element count cap.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Sets the per-item normalized length cap.
    pub fn with_max_item_chars(mut self, max_item_chars: usize) -> Self {
        self.max_item_chars = max_item_chars;
        self
    }

    /// Sets the total output length cap.
    pub fn with_max_output_chars(mut self, max_output_chars: usize) -> Self {
        self.max_output_chars = max_output_chars;
        self
    }
}

/// The pure transformation guarded by the cache.
///
/// Implementations must be deterministic and side-effect free -- the
/// at-most-once guarantee is only meaningful when recomputation would
/// always reproduce the same output.
pub trait Transform: Send + Sync {
    /// Transforms a payload into its output string.
    fn transform(&self, payload: &Payload) -> DomainResult<String>;
}

/// Production transformer.
///
/// Normalizes every element (trim, collapse internal whitespace runs to a
/// single space), interleaves the lists as `a0, b0, a1, b1, ...`, joins
/// with `", "` and upper-cases the result. Two empty lists are valid and
/// produce the empty string.
#[derive(Debug, Clone, Default)]
pub struct InterleaveTransformer {
    limits: TransformLimits,
}

impl InterleaveTransformer {
    /// Creates a transformer with the given limits.
    pub fn new(limits: TransformLimits) -> Self {
        Self { limits }
    }

    fn normalize_list(&self, list: &'static str, items: &[String]) -> DomainResult<Vec<String>> {
        if items.len() > self.limits.max_items {
            return Err(DomainError::TooManyItems {
                list,
                count: items.len(),
                max: self.limits.max_items,
            });
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let normalized = collapse_whitespace(item);
                if normalized.chars().count() > self.limits.max_item_chars {
                    return Err(DomainError::ItemTooLong {
                        list,
                        index,
                        max: self.limits.max_item_chars,
                    });
                }
                Ok(normalized)
            })
            .collect()
    }
}

impl Transform for InterleaveTransformer {
    fn transform(&self, payload: &Payload) -> DomainResult<String> {
        if payload.items_a.len() != payload.items_b.len() {
            return Err(DomainError::LengthMismatch {
                len_a: payload.items_a.len(),
                len_b: payload.items_b.len(),
            });
        }

        let items_a = self.normalize_list("items_a", &payload.items_a)?;
        let items_b = self.normalize_list("items_b", &payload.items_b)?;

        let mut interleaved = Vec::with_capacity(items_a.len() * 2);
        for (a, b) in items_a.into_iter().zip(items_b) {
            interleaved.push(a);
            interleaved.push(b);
        }

        let joined = interleaved.join(", ");
        let len = joined.chars().count();
        if len > self.limits.max_output_chars {
            return Err(DomainError::OutputTooLarge {
                len,
                max: self.limits.max_output_chars,
            });
        }

        Ok(joined.to_uppercase())
    }
}

/// Trims the ends and collapses internal whitespace runs to single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
