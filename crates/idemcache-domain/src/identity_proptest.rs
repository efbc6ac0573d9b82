//! Property-based tests for content hashing.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::payload::{Payload, PayloadId};

    /// Strategy generating arbitrary (not necessarily equal-length) payloads.
    /// The hasher is total, so shape validity is irrelevant here.
    fn payload_strategy() -> impl Strategy<Value = Payload> {
        (
            prop::collection::vec(".{0,16}", 0..8),
            prop::collection::vec(".{0,16}", 0..8),
        )
            .prop_map(|(items_a, items_b)| Payload::new(items_a, items_b))
    }

    proptest! {
        #[test]
        fn hashing_is_deterministic(payload in payload_strategy()) {
            let first = PayloadId::from_payload(&payload);
            let second = PayloadId::from_payload(&payload);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn digest_always_parses(payload in payload_strategy()) {
            let id = PayloadId::from_payload(&payload);
            prop_assert!(PayloadId::parse(id.as_str()).is_ok());
        }

        #[test]
        fn distinct_content_hashes_distinctly(
            p1 in payload_strategy(),
            p2 in payload_strategy(),
        ) {
            prop_assume!(p1 != p2);
            prop_assert_ne!(PayloadId::from_payload(&p1), PayloadId::from_payload(&p2));
        }

        #[test]
        fn appending_an_element_changes_the_digest(
            payload in payload_strategy(),
            extra in ".{0,16}",
        ) {
            let base = PayloadId::from_payload(&payload);
            let mut extended = payload.clone();
            extended.items_a.push(extra);
            prop_assert_ne!(base, PayloadId::from_payload(&extended));
        }
    }
}
