//! Chunking properties: count, round-trip, size bounds

use pagescout::session::{char_len, chunk_text};
use proptest::prelude::*;

proptest! {
    #[test]
    fn chunk_count_is_ceiling_of_length(text in ".{0,400}", chunk_chars in 1usize..64) {
        let chunks = chunk_text(&text, chunk_chars);
        let len = char_len(&text);
        let expected = if len == 0 { 1 } else { len.div_ceil(chunk_chars) };
        prop_assert_eq!(chunks.len(), expected);
    }

    #[test]
    fn concatenation_reproduces_the_document(text in ".{0,400}", chunk_chars in 1usize..64) {
        let chunks = chunk_text(&text, chunk_chars);
        prop_assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn every_chunk_respects_the_size_bound(text in ".{1,400}", chunk_chars in 1usize..64) {
        let chunks = chunk_text(&text, chunk_chars);
        // All chunks but the last are exactly full; the last is non-empty
        for chunk in &chunks[..chunks.len() - 1] {
            prop_assert_eq!(char_len(chunk), chunk_chars);
        }
        let last = chunks.last().unwrap();
        prop_assert!(char_len(last) > 0);
        prop_assert!(char_len(last) <= chunk_chars);
    }
}

#[test]
fn spec_sized_document_chunks_at_5000() {
    let text = "x".repeat(12_345);
    let chunks = chunk_text(&text, 5000);
    assert_eq!(chunks.len(), 3);
    assert_eq!(char_len(&chunks[0]), 5000);
    assert_eq!(char_len(&chunks[1]), 5000);
    assert_eq!(char_len(&chunks[2]), 2345);
}
