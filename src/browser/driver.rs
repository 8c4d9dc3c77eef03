//! Capability interface over a live browser page
//!
//! Tools and the session store depend on [`PageDriver`] rather than on
//! chromiumoxide directly, so page handles can be stubbed in tests and the
//! CDP backend stays swappable.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

/// Maximum time to wait for a page body to appear after navigation
const BODY_SETTLE_TIMEOUT_SECS: u64 = 10;

/// Extra settle delay for client-side rendering after the body appears
const RENDER_SETTLE_MS: u64 = 500;

/// Minimal driving surface for a fetched page
///
/// `release` consumes the handle; failures during release are for the caller
/// to swallow (cleanup is best-effort by contract).
pub trait PageDriver: Send + Sync {
    /// Navigate the page to `url` and wait for it to settle
    fn navigate<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Inner text of the first element matching a CSS selector
    fn extract_text<'a>(&'a self, selector: &'a str) -> BoxFuture<'a, Result<String>>;

    /// Inner text of every element matching a CSS selector
    fn extract_text_all<'a>(&'a self, selector: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;

    /// Close the underlying page
    fn release(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

/// Chrome DevTools Protocol implementation of [`PageDriver`]
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

impl PageDriver for CdpPage {
    fn navigate<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            self.page
                .goto(url)
                .await
                .with_context(|| format!("Failed to navigate to {url}"))?;
            self.page
                .wait_for_navigation()
                .await
                .context("Failed to wait for page load")?;
            wait_for_body(&self.page).await;
            Ok(())
        }
        .boxed()
    }

    fn extract_text<'a>(&'a self, selector: &'a str) -> BoxFuture<'a, Result<String>> {
        async move {
            let element = self
                .page
                .find_element(selector)
                .await
                .with_context(|| format!("No element matches selector '{selector}'"))?;
            let text = element
                .inner_text()
                .await
                .with_context(|| format!("Failed to read text for selector '{selector}'"))?
                .unwrap_or_default();
            Ok(text)
        }
        .boxed()
    }

    fn extract_text_all<'a>(&'a self, selector: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        async move {
            let elements = self
                .page
                .find_elements(selector)
                .await
                .with_context(|| format!("No elements match selector '{selector}'"))?;
            let mut texts = Vec::with_capacity(elements.len());
            for element in elements {
                if let Ok(Some(text)) = element.inner_text().await {
                    texts.push(text);
                }
            }
            Ok(texts)
        }
        .boxed()
    }

    fn release(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        async move {
            self.page.close().await.context("Failed to close page")?;
            Ok(())
        }
        .boxed()
    }
}

/// Poll for the document body after navigation
///
/// `wait_for_navigation` returns when the HTTP response arrives; client-side
/// rendered pages need additional time before their text is in the DOM.
/// Timing out here is not an error - extraction proceeds with whatever has
/// rendered.
async fn wait_for_body(page: &Page) {
    let start = Instant::now();
    let max_wait = Duration::from_secs(BODY_SETTLE_TIMEOUT_SECS);
    let poll_interval = Duration::from_millis(200);

    loop {
        if page.find_element("body").await.is_ok() {
            debug!(
                "Page body appeared after {:.2}s",
                start.elapsed().as_secs_f64()
            );
            break;
        }
        if start.elapsed() >= max_wait {
            debug!("Timeout waiting for page body, proceeding anyway");
            return;
        }
        tokio::time::sleep(poll_interval).await;
    }

    tokio::time::sleep(Duration::from_millis(RENDER_SETTLE_MS)).await;
}
