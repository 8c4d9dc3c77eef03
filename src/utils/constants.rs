//! Shared configuration constants for pagescout
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Maximum chunk size: 5000 characters
///
/// Fetched page text is sliced into chunks of at most this many characters.
/// Chunks are cut at fixed character offsets, not word or sentence
/// boundaries, so concatenating all chunks reproduces the document exactly.
pub const DEFAULT_CHUNK_CHARS: usize = 5000;

/// Session idle timeout: 30 minutes
///
/// Sessions whose `last_used` timestamp is older than this are unreachable
/// for reads and removed by the next sweep.
pub const SESSION_TIMEOUT_SECS: u64 = 30 * 60;

/// Maximum number of live sessions before LRU eviction
///
/// Bounds store memory deterministically; inserting past this limit evicts
/// the least recently used session and releases its page handle.
pub const MAX_SESSIONS: usize = 16;

/// Background sweep interval for the session cleanup task
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// In-page search collects at most `multiplier * num_snippets` match offsets
///
/// A safety cap on the eager scan, not a precision guarantee: callers paging
/// through with `search_next_on_page` can exhaust the capped list.
pub const MATCH_SCAN_MULTIPLIER: usize = 10;

/// Characters of context kept on each side of an in-page search match
pub const SNIPPET_CONTEXT_CHARS: usize = 100;

/// Chrome user agent string for stealth mode
///
/// Chrome releases new stable versions ~every 4 weeks; update quarterly to
/// stay within a reasonable version window.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
