//! Fixed-size chunking of fetched page text
//!
//! Documents are sliced at fixed character offsets into chunks of at most
//! `chunk_chars` characters. The slicing is position-based, not word- or
//! sentence-aware: concatenating the chunks reproduces the document exactly.

/// Number of characters in a string
///
/// Chunk sizes are measured in characters, matching the offsets used by the
/// in-page search scan.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` into chunks of at most `chunk_chars` characters
///
/// The final chunk may be shorter. An empty document yields exactly one
/// empty chunk so chunk index 0 always exists.
#[must_use]
pub fn chunk_text(text: &str, chunk_chars: usize) -> Vec<String> {
    debug_assert!(chunk_chars > 0, "chunk size must be non-zero");

    if text.is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == chunk_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Format a chunk for delivery to the caller
///
/// Prefixes a `Chunk <index>` header line and appends a `...` continuation
/// marker when the chunk is exactly full size, a heuristic signal that more
/// text may follow.
#[must_use]
pub fn format_chunk(index: usize, text: &str, chunk_chars: usize) -> String {
    let mut formatted = format!("Chunk {index}\n{text}");
    if char_len(text) == chunk_chars {
        formatted.push_str("...");
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_single_empty_chunk() {
        let chunks = chunk_text("", 5000);
        assert_eq!(chunks, vec![String::new()]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_chunk() {
        let chunks = chunk_text(&"a".repeat(10), 5);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 5));
    }

    #[test]
    fn last_chunk_may_be_shorter() {
        let chunks = chunk_text(&"a".repeat(12), 5);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 2);
    }

    #[test]
    fn concatenation_round_trips() {
        let text = "The quick brown fox jumps over the lazy dog".repeat(40);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_text_chunks_on_char_boundaries() {
        let text = "héllo wörld ünïcode".repeat(10);
        let chunks = chunk_text(&text, 7);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| char_len(c) <= 7));
    }

    #[test]
    fn full_chunk_gets_continuation_marker() {
        assert_eq!(format_chunk(0, "abcde", 5), "Chunk 0\nabcde...");
        assert_eq!(format_chunk(3, "ab", 5), "Chunk 3\nab");
    }
}
