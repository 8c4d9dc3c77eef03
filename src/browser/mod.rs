//! Browser lifecycle management
//!
//! A single chromiumoxide browser is shared by all tools, launched lazily on
//! first use and reused for subsequent calls. [`BrowserManager`] performs a
//! health check on every acquisition and recovers from crashed instances
//! automatically; [`PageDriver`] is the capability surface the rest of the
//! crate drives pages through.

pub mod driver;
pub mod launch;

pub use driver::{CdpPage, PageDriver};
pub use launch::{BrowserWrapper, find_browser_executable, launch_browser};

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Manager for the shared browser instance
///
/// # Lifecycle
/// - Browser NOT launched on manager creation (lazy initialization)
/// - First `get_or_launch()` call launches the browser (~2-3s)
/// - Subsequent calls return the existing browser after a health check
/// - `shutdown()` explicitly closes the browser (called on server shutdown)
#[derive(Clone)]
pub struct BrowserManager {
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
}

impl BrowserManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            browser: Arc::new(Mutex::new(None)),
        }
    }

    /// Get or launch the shared browser, with health check and auto-recovery
    ///
    /// A `version()` CDP call verifies an existing browser is alive; a
    /// crashed instance is cleaned up and replaced transparently.
    pub async fn get_or_launch(&self) -> Result<Arc<Mutex<Option<BrowserWrapper>>>> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser().version().await {
                Ok(_) => {
                    debug!("Browser health check passed, reusing existing browser");
                    drop(guard);
                    return Ok(self.browser.clone());
                }
                Err(e) => {
                    warn!("Browser health check failed: {e}. Triggering recovery...");
                    if let Some(mut crashed) = guard.take() {
                        let _ = crashed.browser_mut().close().await;
                        let _ = crashed.browser_mut().wait().await;
                        crashed.cleanup_temp_dir();
                    }
                    info!("Crashed browser cleaned up, launching new instance");
                }
            }
        }

        info!("Launching browser (first use or after recovery)");
        let (browser, handler, user_data_dir) = launch_browser().await?;
        *guard = Some(BrowserWrapper::new(browser, handler, user_data_dir));
        drop(guard);

        Ok(self.browser.clone())
    }

    /// Open a fresh blank page on the shared browser
    pub async fn open_page(&self) -> Result<CdpPage> {
        let browser = self.get_or_launch().await?;
        let guard = browser.lock().await;
        let wrapper = guard
            .as_ref()
            .ok_or_else(|| anyhow!("Browser is not running"))?;
        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;
        Ok(CdpPage::new(page))
    }

    /// Shutdown the browser if running
    ///
    /// Safe to call multiple times; subsequent calls are no-ops. The browser
    /// process is closed explicitly because `BrowserWrapper::drop` only
    /// aborts the handler task.
    pub async fn shutdown(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;

        if let Some(mut wrapper) = guard.take() {
            info!("Shutting down shared browser");
            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
            wrapper.cleanup_temp_dir();
            drop(wrapper);
        }

        Ok(())
    }
}

impl Default for BrowserManager {
    fn default() -> Self {
        Self::new()
    }
}
