//! Runtime configuration for session storage and in-page search
//!
//! Defaults come from [`crate::utils::constants`]; tests override the
//! timeouts and capacities through the builder-style setters.

use std::time::Duration;

use crate::utils::constants::{
    DEFAULT_CHUNK_CHARS, MATCH_SCAN_MULTIPLIER, MAX_SESSIONS, SESSION_TIMEOUT_SECS,
    SNIPPET_CONTEXT_CHARS, SWEEP_INTERVAL_SECS,
};

/// Tuning knobs for the session store and page-search subsystem
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Maximum characters per content chunk
    pub chunk_chars: usize,
    /// Idle time after which a session becomes unreachable
    pub session_timeout: Duration,
    /// Maximum live sessions before LRU eviction on insert
    pub max_sessions: usize,
    /// Period of the background eviction sweep
    pub sweep_interval: Duration,
    /// Search collects at most `match_scan_multiplier * num_snippets` offsets
    pub match_scan_multiplier: usize,
    /// Characters of context on each side of a search match
    pub snippet_context_chars: usize,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            chunk_chars: DEFAULT_CHUNK_CHARS,
            session_timeout: Duration::from_secs(SESSION_TIMEOUT_SECS),
            max_sessions: MAX_SESSIONS,
            sweep_interval: Duration::from_secs(SWEEP_INTERVAL_SECS),
            match_scan_multiplier: MATCH_SCAN_MULTIPLIER,
            snippet_context_chars: SNIPPET_CONTEXT_CHARS,
        }
    }
}

impl ScoutConfig {
    #[must_use]
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        debug_assert!(chunk_chars > 0, "chunk size must be non-zero");
        self.chunk_chars = chunk_chars;
        self
    }

    #[must_use]
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        debug_assert!(max_sessions > 0, "store must admit at least one session");
        self.max_sessions = max_sessions;
        self
    }

    #[must_use]
    pub fn with_snippet_context_chars(mut self, context: usize) -> Self {
        self.snippet_context_chars = context;
        self
    }
}
