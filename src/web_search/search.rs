//! Core search execution logic
//!
//! Handles navigating to the results page, waiting for client-side rendering,
//! and extracting result data.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::page::Page;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use super::types::{
    RESULTS_WAIT_TIMEOUT_SECS, SEARCH_RESULT_SELECTOR, SEARCH_URL, SNIPPET_SELECTOR, SearchResult,
    TITLE_SELECTOR,
};

/// Navigate to the `DuckDuckGo` results page for `query` and wait for results
///
/// `DuckDuckGo` renders results client-side, so after navigation we poll for
/// the result selector instead of trusting `wait_for_navigation` alone.
pub async fn perform_search(page: &Page, query: &str) -> Result<()> {
    let mut search_url = Url::parse(SEARCH_URL).context("Failed to parse search base URL")?;
    search_url
        .query_pairs_mut()
        .append_pair("q", query)
        .append_pair("ia", "web");

    debug!("Navigating to search results: {search_url}");
    page.goto(search_url.as_str())
        .await
        .context("Failed to navigate to search page")?;
    page.wait_for_navigation()
        .await
        .context("Failed to wait for initial page load")?;

    let poll_start = Instant::now();
    let max_wait = Duration::from_secs(RESULTS_WAIT_TIMEOUT_SECS);
    let poll_interval = Duration::from_millis(200);

    loop {
        if page.find_element(SEARCH_RESULT_SELECTOR).await.is_ok() {
            debug!(
                "Search results appeared after {:.2}s",
                poll_start.elapsed().as_secs_f64()
            );
            return Ok(());
        }

        if poll_start.elapsed() >= max_wait {
            let url = page.url().await.ok().flatten().unwrap_or_default();
            if url.contains("captcha") || url.contains("/sorry/") {
                return Err(anyhow!(
                    "Search engine presented a CAPTCHA page. Try again later or from a different network."
                ));
            }
            return Err(anyhow!(
                "Timeout waiting for search results to render after {}s. \
                 This may indicate network issues or a results-page DOM change.",
                max_wait.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Extract up to `limit` results from the rendered results page
///
/// URLs must exist (critical); titles fall back to a placeholder; snippets
/// gracefully default when missing.
pub async fn extract_results(page: &Page, limit: usize) -> Result<Vec<SearchResult>> {
    let result_elements = page
        .find_elements(SEARCH_RESULT_SELECTOR)
        .await
        .context("Failed to find search results")?;

    debug!("Found {} search results", result_elements.len());

    if result_elements.is_empty() {
        let url = page.url().await.ok().flatten().unwrap_or_default();
        if url.contains("captcha") || url.contains("/sorry/") {
            return Err(anyhow!(
                "CAPTCHA detected; no search results available. Try again later."
            ));
        }
        return Err(anyhow!(
            "No search results found. The results-page DOM may have changed \
             (selector '{SEARCH_RESULT_SELECTOR}'), or the engine is unavailable. \
             Current URL: {url}"
        ));
    }

    let mut results = Vec::new();

    for (index, element) in result_elements.into_iter().enumerate().take(limit) {
        let title = match element.find_element(TITLE_SELECTOR).await {
            Ok(el) => el
                .inner_text()
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| format!("Untitled Result {}", index + 1)),
            Err(_) => format!("Untitled Result {}", index + 1),
        };

        let url = element
            .find_element(TITLE_SELECTOR)
            .await
            .with_context(|| {
                format!(
                    "Result {}: link element not found with selector '{TITLE_SELECTOR}'",
                    index + 1
                )
            })?
            .attribute("href")
            .await
            .with_context(|| format!("Failed to read href for result {}", index + 1))?
            .ok_or_else(|| anyhow!("Result {}: link href attribute is empty", index + 1))?;

        let snippet = match element.find_element(SNIPPET_SELECTOR).await {
            Ok(el) => el
                .inner_text()
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| "No description available".to_string()),
            Err(_) => "No description available".to_string(),
        };

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    Ok(results)
}

/// Classify errors into retryable vs permanent failures
///
/// Browser/page state errors fail fast; timeouts and network hiccups retry;
/// unknown errors retry conservatively.
fn is_retryable_error(error: &anyhow::Error) -> bool {
    let text = error.to_string().to_lowercase();

    if text.contains("browser closed")
        || text.contains("browser disconnected")
        || text.contains("page closed")
        || text.contains("target closed")
        || text.contains("session closed")
        || text.contains("captcha")
        || text.contains("websocket")
    {
        return false;
    }

    if text.contains("timeout")
        || text.contains("timed out")
        || text.contains("network")
        || text.contains("connection refused")
        || text.contains("connection reset")
        || text.contains("rate limit")
        || text.contains("429")
    {
        return true;
    }

    true
}

/// Retry an operation with exponential backoff, jitter, and error classification
pub async fn retry_with_backoff<F, Fut, T>(f: F, max_retries: u32) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable_error(&e) {
                    warn!("Non-retryable error, failing fast: {e:?}");
                    return Err(e);
                }
                if retries >= max_retries {
                    warn!("Max retries ({max_retries}) exceeded: {e:?}");
                    return Err(e);
                }

                let delay = 2u64.pow(retries) * 1000 + rand::rng().random_range(0..1000);
                warn!(
                    "Retryable error, attempt {}/{max_retries}, retrying in {delay}ms: {e:?}",
                    retries + 1
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                retries += 1;
            }
        }
    }
}
