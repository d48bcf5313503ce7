//! Browser session shared by the cases of one suite
//!
//! # Lifecycle
//!
//! - `acquire()` launches Chrome and opens the single page the suite reuses
//! - cases borrow the page through [`BrowserSession::document`]
//! - `shutdown()` closes the browser, waits for the process and removes the
//!   profile directory
//!
//! The suite runner calls `shutdown()` on every exit path. Dropping a session
//! without it only aborts the CDP handler and orphans the profile directory.

use anyhow::Result;
use tracing::info;

use crate::BrowserConfig;
use crate::browser::{BrowserError, BrowserResult, BrowserWrapper, create_blank_page, launch_browser};
use crate::document::ChromeDocument;

pub struct BrowserSession {
    wrapper: Option<BrowserWrapper>,
    document: ChromeDocument,
}

impl BrowserSession {
    /// Launch a browser and open a blank page
    ///
    /// # Performance
    /// ~2-3s (launches Chrome), longer when a managed Chromium must be downloaded first
    pub async fn acquire(config: &BrowserConfig) -> BrowserResult<Self> {
        let (browser, handler, user_data_dir) = launch_browser(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(format!("{e:#}")))?;
        let mut wrapper = BrowserWrapper::new(browser, handler, user_data_dir);

        match wrapper.browser().version().await {
            Ok(version) => info!(product = %version.product, "browser session acquired"),
            Err(e) => tracing::warn!("Browser version probe failed: {}", e),
        }

        let page = match create_blank_page(&wrapper).await {
            Ok(page) => page,
            Err(e) => {
                Self::close_wrapper(&mut wrapper).await;
                return Err(BrowserError::PageCreationFailed(format!("{e:#}")));
            }
        };

        Ok(Self {
            wrapper: Some(wrapper),
            document: ChromeDocument::new(page),
        })
    }

    pub fn document(&self) -> &ChromeDocument {
        &self.document
    }

    /// Check if the browser is still owned by this session
    pub fn is_open(&self) -> bool {
        self.wrapper.is_some()
    }

    /// Shut the browser down
    ///
    /// Safe to call multiple times (subsequent calls are no-ops).
    ///
    /// We must call BOTH `browser.close()` and `browser.wait()`:
    /// `BrowserWrapper::drop()` only aborts the handler task and does NOT
    /// close the Chrome process.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(mut wrapper) = self.wrapper.take() {
            info!("Shutting down browser");
            Self::close_wrapper(&mut wrapper).await;
            drop(wrapper);
        }
        Ok(())
    }

    async fn close_wrapper(wrapper: &mut BrowserWrapper) {
        if let Err(e) = wrapper.browser_mut().close().await {
            tracing::warn!("Failed to close browser cleanly: {}", e);
        }

        if let Err(e) = wrapper.browser_mut().wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }

        wrapper.cleanup_temp_dir();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.wrapper.is_some() {
            info!("BrowserSession dropping without shutdown - browser will be cleaned up by Drop");
        }
    }
}
