//! Data structures and constants for web search

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// `DuckDuckGo` search URL base
pub const SEARCH_URL: &str = "https://duckduckgo.com";

/// CSS selector for individual search results
/// `DuckDuckGo` uses article elements with data-testid="result"
pub const SEARCH_RESULT_SELECTOR: &str = "article[data-testid='result']";

/// CSS selector for result titles (the title link also carries the URL)
pub const TITLE_SELECTOR: &str = "h2 > a";

/// CSS selector for result snippets/descriptions
pub const SNIPPET_SELECTOR: &str = "div[data-result='snippet']";

/// Maximum time to wait for results to render (seconds)
pub const RESULTS_WAIT_TIMEOUT_SECS: u64 = 5;

/// Maximum number of retry attempts
pub const MAX_RETRIES: u32 = 3;

/// Maximum number of results to extract
pub const MAX_RESULTS: usize = 10;

/// Maximum accepted query length in characters
pub const MAX_QUERY_LENGTH: usize = 500;

// =============================================================================
// Data Structures
// =============================================================================

/// A single search result with title, URL, and snippet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: String,

    /// Page URL
    pub url: String,

    /// Description snippet from the results page
    pub snippet: String,
}

/// Collection of search results for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Search query that produced these results
    pub query: String,

    /// List of search results
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    /// Create new `SearchResults`
    #[must_use]
    pub fn new(query: String, results: Vec<SearchResult>) -> Self {
        Self { query, results }
    }
}
