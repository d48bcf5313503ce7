//! Rendered document access
//!
//! The suites and the poller only ever talk to a page through [`Document`],
//! which keeps them independent of chromiumoxide and lets unit tests run
//! against scripted pages.

mod chrome;
#[cfg(test)]
pub(crate) mod fake;

pub use chrome::ChromeDocument;

use async_trait::async_trait;
use serde::Deserialize;

use crate::browser::BrowserResult;

/// Anchor or button found by a link probe
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkInfo {
    pub href: Option<String>,
    pub text: String,
}

#[async_trait]
pub trait Document: Send + Sync {
    /// Navigate and wait for the load to commit
    async fn goto(&self, url: &str) -> BrowserResult<()>;

    async fn current_url(&self) -> BrowserResult<String>;

    async fn title(&self) -> BrowserResult<Option<String>>;

    /// Serialized DOM (`outerHTML` of the document)
    async fn page_source(&self) -> BrowserResult<String>;

    /// Visible text of `document.body`
    async fn body_text(&self) -> BrowserResult<String>;

    /// Number of elements matching a CSS selector
    async fn count(&self, selector: &str) -> BrowserResult<usize>;

    async fn links(&self, selector: &str) -> BrowserResult<Vec<LinkInfo>>;

    /// `document.readyState`
    async fn ready_state(&self) -> BrowserResult<String>;

    /// Full-page PNG capture
    async fn screenshot(&self) -> BrowserResult<Vec<u8>>;
}
