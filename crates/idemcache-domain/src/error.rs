//! Domain error types for cache operations.

use thiserror::Error;

/// Validation errors raised by the transformer and identifier parsing.
///
/// All variants are client-caused and map to 400-class responses at the
/// API layer; none of them is retriable.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The two input lists differ in length.
    #[error("items_a and items_b must be of the same length ({len_a} != {len_b})")]
    LengthMismatch { len_a: usize, len_b: usize },

    /// A list exceeds the configured element count cap.
    #[error("{list} exceeds maximum allowed items (max: {max})")]
    TooManyItems {
        list: &'static str,
        count: usize,
        max: usize,
    },

    /// A normalized element exceeds the configured per-item length cap.
    #[error("{list}[{index}] exceeds maximum allowed length (max: {max})")]
    ItemTooLong {
        list: &'static str,
        index: usize,
        max: usize,
    },

    /// The joined output exceeds the configured total length cap.
    #[error("final output exceeds maximum allowed length (max: {max}); reduce input size")]
    OutputTooLarge { len: usize, max: usize },

    /// A read-path identifier is not a well-formed content digest.
    #[error("invalid payload identifier format: {value}")]
    InvalidIdentifier { value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
