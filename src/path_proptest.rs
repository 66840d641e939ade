//! Property-based tests for the path encoding functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{decode, encode, file_path};
    use proptest::prelude::*;

    fn is_safe_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    proptest! {
        /// Property: encoding a string already restricted to the safe set
        /// returns it unchanged.
        #[test]
        fn encode_is_identity_on_safe_input(input in "[A-Za-z0-9_]*") {
            prop_assert_eq!(encode(&input), input);
        }

        /// Property: encoded output only ever contains the safe set plus
        /// the escape dot and uppercase hex digits.
        #[test]
        fn encode_output_alphabet_is_restricted(input in ".*") {
            let encoded = encode(&input);
            for ch in encoded.chars() {
                prop_assert!(
                    is_safe_char(ch) || ch == '.',
                    "unexpected character '{}' in encoding of '{}'",
                    ch,
                    input
                );
            }
        }

        /// Property: decoding recovers the original bytes for any input.
        #[test]
        fn encode_decode_roundtrip(input in ".*") {
            let encoded = encode(&input);
            prop_assert_eq!(decode(&encoded), Some(input.as_bytes().to_vec()));
        }

        /// Property: encoding is deterministic.
        #[test]
        fn encode_is_deterministic(input in ".*") {
            prop_assert_eq!(encode(&input), encode(&input));
        }

        /// Property: generated paths never contain bytes that are unsafe
        /// in a fast-import path (the directory separators are the only
        /// non-encoded structure).
        #[test]
        fn file_path_segments_are_safe(
            title in ".*",
            namespace in ".*",
            deepness in 0u32..8,
        ) {
            let path = file_path(&title, &namespace, false, false, deepness);
            for segment in path.split('/') {
                for ch in segment.chars() {
                    prop_assert!(
                        is_safe_char(ch) || ch == '.' || ch == '-',
                        "unsafe character '{}' in path '{}'",
                        ch,
                        path
                    );
                }
            }
        }

        /// Property: the number of directory levels is the minimum of the
        /// deepness and the title's byte length.
        #[test]
        fn file_path_level_count_matches_deepness(
            title in "[A-Za-z0-9_]{0,16}",
            deepness in 0u32..8,
        ) {
            let path = file_path(&title, "", false, false, deepness);
            let levels = path.split('/').count() - 2; // namespace segment + filename
            let expected = (deepness as usize).min(title.len());
            prop_assert_eq!(levels, expected);
        }
    }
}
