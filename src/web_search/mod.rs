//! Web search via browser automation
//!
//! Performs `DuckDuckGo` searches using the shared managed browser and
//! returns structured results with titles, URLs, and snippets.

mod search;
mod types;

pub use types::{MAX_QUERY_LENGTH, MAX_RESULTS, MAX_RETRIES, SearchResult, SearchResults};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::browser::BrowserManager;

/// Perform a web search using the shared browser
///
/// An empty or whitespace-only query returns an empty result set rather than
/// an error. Each retry attempt gets a fresh page, closed on every exit path.
pub async fn search_with_manager(
    manager: &BrowserManager,
    query: impl Into<String>,
    max_results: usize,
) -> Result<SearchResults> {
    let query = query.into();
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Ok(SearchResults::new(query, Vec::new()));
    }

    if trimmed.len() > MAX_QUERY_LENGTH {
        anyhow::bail!(
            "Search query is too long ({} characters). Maximum allowed: {} characters.",
            trimmed.len(),
            MAX_QUERY_LENGTH
        );
    }

    let query = trimmed.to_string();
    let limit = max_results.clamp(1, MAX_RESULTS);

    info!("Starting web search for query: '{query}'");

    let browser = manager.get_or_launch().await?;

    let results = search::retry_with_backoff(
        || {
            let query = query.clone();
            let browser = browser.clone();
            async move {
                // Fresh page per attempt; the browser lock is held only long
                // enough to create it
                let page = {
                    let guard = browser.lock().await;
                    let wrapper = guard
                        .as_ref()
                        .ok_or_else(|| anyhow!("Browser is not running"))?;
                    wrapper
                        .browser()
                        .new_page("about:blank")
                        .await
                        .context("Failed to create blank page")?
                };

                let outcome = async {
                    search::perform_search(&page, &query).await?;
                    search::extract_results(&page, limit).await
                }
                .await;

                // Page closed on every exit path
                if let Err(e) = page.clone().close().await {
                    tracing::debug!("Failed to close search page: {e}");
                }

                outcome
            }
        },
        MAX_RETRIES,
    )
    .await?;

    info!("Search completed with {} results", results.len());
    Ok(SearchResults::new(query, results))
}
