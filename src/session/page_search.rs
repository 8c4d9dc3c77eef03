//! Incremental substring search over a session's chunk store
//!
//! Matches are found case-insensitively across the concatenated chunk text,
//! ignoring chunk boundaries, and paginated through a single resumable
//! cursor. Starting a new search silently discards any in-progress
//! continuation; the cursor holds a weak back-reference to its session and
//! errors out if that session has since been evicted.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::chunks::char_len;
use super::store::{SessionSnapshot, SessionStore};
use crate::config::ScoutConfig;
use crate::error::{ScrapeError, ScrapeResult};

/// One match with its human-readable context window
#[derive(Debug, Clone, Serialize)]
pub struct PageMatch {
    /// Index of the chunk the match starts in
    pub chunk_index: usize,
    /// Context window with the matched text wrapped in brackets
    pub snippet: String,
    /// Character offset of the match in the concatenated chunk text
    pub position: usize,
}

/// Result of a search or continuation call
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub search_text: String,
    /// Total offsets collected by the eager scan (subject to the scan cap)
    pub total_matches: usize,
    pub snippets: Vec<PageMatch>,
    /// Whether undelivered offsets remain; only reported by continuations
    pub has_more_results: Option<bool>,
}

/// Resumable state of one in-progress search
struct SearchCursor {
    search_text: String,
    /// Originating session; lookup only, does not extend its lifetime
    session_id: String,
    /// Character offsets of every collected match, in document order
    matches: Vec<usize>,
    /// How many offsets have been returned to the caller so far
    delivered: usize,
}

/// Single-slot holder for the in-progress search
///
/// The tool surface carries no search handle, so at most one search cursor
/// exists per server context; every new search overwrites the slot. Not
/// safe for interleaved searches from concurrent conversations, which the
/// host contract excludes.
#[derive(Clone)]
pub struct SearchSlot {
    inner: Arc<Mutex<Option<SearchCursor>>>,
    config: ScoutConfig,
}

impl SearchSlot {
    #[must_use]
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            config,
        }
    }

    /// Run a fresh search over a session snapshot, replacing any prior cursor
    ///
    /// Scans eagerly for up to `match_scan_multiplier * num_snippets` offsets
    /// and returns snippets for the first `num_snippets` of them.
    pub async fn begin(
        &self,
        snapshot: &SessionSnapshot,
        needle: &str,
        num_snippets: usize,
    ) -> SearchOutcome {
        let text = snapshot.chunks.concat();
        let haystack: Vec<char> = text.chars().collect();
        let cap = num_snippets.saturating_mul(self.config.match_scan_multiplier);
        let matches = find_matches(&haystack, needle, cap);

        let delivered = num_snippets.min(matches.len());
        let needle_chars = char_len(needle);
        let snippets: Vec<PageMatch> = matches[..delivered]
            .iter()
            .map(|&offset| {
                build_page_match(
                    &haystack,
                    &snapshot.chunks,
                    offset,
                    needle_chars,
                    self.config.snippet_context_chars,
                )
            })
            .collect();

        debug!(
            session_id = %snapshot.session_id,
            total = matches.len(),
            delivered,
            "Search scan complete"
        );

        let mut slot = self.inner.lock().await;
        *slot = Some(SearchCursor {
            search_text: needle.to_string(),
            session_id: snapshot.session_id.clone(),
            matches: matches.clone(),
            delivered,
        });

        SearchOutcome {
            search_text: needle.to_string(),
            total_matches: matches.len(),
            snippets,
            has_more_results: None,
        }
    }

    /// Serve the next batch of offsets from the stored cursor
    ///
    /// Re-resolves the originating session through the store (erroring if it
    /// has been evicted) and re-concatenates its chunks; the offset list
    /// itself is not recomputed.
    pub async fn continue_search(
        &self,
        store: &SessionStore,
        num_snippets: usize,
    ) -> ScrapeResult<SearchOutcome> {
        let (search_text, session_id, delivered, matches) = {
            let slot = self.inner.lock().await;
            let cursor = slot.as_ref().ok_or(ScrapeError::NoActiveSearch)?;
            (
                cursor.search_text.clone(),
                cursor.session_id.clone(),
                cursor.delivered,
                cursor.matches.clone(),
            )
        };

        let snapshot = store.snapshot(&session_id).await?;
        let text = snapshot.chunks.concat();
        let haystack: Vec<char> = text.chars().collect();

        let end = delivered.saturating_add(num_snippets).min(matches.len());
        let needle_chars = char_len(&search_text);
        let snippets: Vec<PageMatch> = matches[delivered..end]
            .iter()
            .map(|&offset| {
                build_page_match(
                    &haystack,
                    &snapshot.chunks,
                    offset,
                    needle_chars,
                    self.config.snippet_context_chars,
                )
            })
            .collect();

        {
            let mut slot = self.inner.lock().await;
            if let Some(cursor) = slot.as_mut() {
                cursor.delivered = end;
            }
        }

        Ok(SearchOutcome {
            search_text,
            total_matches: matches.len(),
            snippets,
            has_more_results: Some(matches.len() > end),
        })
    }
}

/// Case-fold a character one-to-one
///
/// Multi-character lowercase expansions keep the original character so match
/// offsets stay aligned with the unfolded text.
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

/// Collect case-insensitive match offsets, advancing one character per hit
///
/// Overlapping occurrences are all found. Stops once `cap` offsets have been
/// collected. An empty needle matches nothing.
fn find_matches(haystack: &[char], needle: &str, cap: usize) -> Vec<usize> {
    let needle: Vec<char> = needle.chars().map(fold_char).collect();
    if needle.is_empty() || cap == 0 || haystack.len() < needle.len() {
        return Vec::new();
    }

    let folded: Vec<char> = haystack.iter().copied().map(fold_char).collect();
    let mut offsets = Vec::new();

    for start in 0..=(folded.len() - needle.len()) {
        if folded[start..start + needle.len()] == needle[..] {
            offsets.push(start);
            if offsets.len() >= cap {
                break;
            }
        }
    }

    offsets
}

/// Build the context snippet and chunk attribution for one match offset
fn build_page_match(
    haystack: &[char],
    chunks: &[String],
    offset: usize,
    needle_chars: usize,
    context: usize,
) -> PageMatch {
    let start = offset.saturating_sub(context);
    let match_end = (offset + needle_chars).min(haystack.len());
    let end = (match_end + context).min(haystack.len());

    let before: String = haystack[start..offset].iter().collect();
    let matched: String = haystack[offset..match_end].iter().collect();
    let after: String = haystack[match_end..end].iter().collect();

    PageMatch {
        chunk_index: chunk_index_for(chunks, offset),
        snippet: format!("...{before}[{matched}]{after}..."),
        position: offset,
    }
}

/// Locate the chunk containing a character offset by walking cumulative
/// chunk boundaries
fn chunk_index_for(chunks: &[String], offset: usize) -> usize {
    let mut position = 0;
    for (index, chunk) in chunks.iter().enumerate() {
        let len = char_len(chunk);
        if offset < position + len {
            return index;
        }
        position += len;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_overlapping_matches() {
        let hay: Vec<char> = "aaaa".chars().collect();
        assert_eq!(find_matches(&hay, "aa", 100), vec![0, 1, 2]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hay: Vec<char> = "The THE the".chars().collect();
        assert_eq!(find_matches(&hay, "the", 100), vec![0, 4, 8]);
        assert_eq!(find_matches(&hay, "THE", 100), vec![0, 4, 8]);
    }

    #[test]
    fn scan_stops_at_cap() {
        let hay: Vec<char> = "x".repeat(500).chars().collect();
        assert_eq!(find_matches(&hay, "x", 50).len(), 50);
    }

    #[test]
    fn empty_needle_matches_nothing() {
        let hay: Vec<char> = "abc".chars().collect();
        assert!(find_matches(&hay, "", 100).is_empty());
    }

    #[test]
    fn snippet_clamps_at_buffer_bounds() {
        let hay: Vec<char> = "match at the start".chars().collect();
        let m = build_page_match(&hay, &["match at the start".to_string()], 0, 5, 100);
        assert_eq!(m.snippet, "...[match] at the start...");
        assert_eq!(m.position, 0);
    }

    #[test]
    fn snippet_windows_context() {
        let hay: Vec<char> = "aaaa needle bbbb".chars().collect();
        let m = build_page_match(&hay, &["aaaa needle bbbb".to_string()], 5, 6, 2);
        assert_eq!(m.snippet, "...a [needle] b...");
    }

    #[test]
    fn chunk_attribution_walks_boundaries() {
        let chunks = vec!["aaaaa".to_string(), "bbbbb".to_string(), "cc".to_string()];
        assert_eq!(chunk_index_for(&chunks, 0), 0);
        assert_eq!(chunk_index_for(&chunks, 4), 0);
        assert_eq!(chunk_index_for(&chunks, 5), 1);
        assert_eq!(chunk_index_for(&chunks, 10), 2);
    }
}
