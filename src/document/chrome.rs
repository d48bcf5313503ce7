//! [`Document`] implementation over a chromiumoxide page

use async_trait::async_trait;
use chromiumoxide::page::{Page, ScreenshotParams};
use chromiumoxide_cdp::cdp::browser_protocol::page::CaptureScreenshotFormat;
use serde_json::Value;
use tracing::debug;

use super::{Document, LinkInfo};
use crate::browser::{BrowserError, BrowserResult};

#[derive(Debug, Clone)]
pub struct ChromeDocument {
    page: Page,
}

impl ChromeDocument {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval(&self, script: String) -> BrowserResult<Value> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ScriptFailed(format!("Failed to parse result from JavaScript: {e}")))
    }
}

/// Quote a selector as a JavaScript string literal
fn js_string(selector: &str) -> String {
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl Document for ChromeDocument {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        debug!(url, "navigating");
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: format!("Failed to wait for page load completion: {e}"),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::ScriptFailed(format!("Failed to get URL: {e}")))?;
        Ok(url.unwrap_or_default())
    }

    async fn title(&self) -> BrowserResult<Option<String>> {
        self.page
            .get_title()
            .await
            .map_err(|e| BrowserError::ScriptFailed(format!("Failed to get title: {e}")))
    }

    async fn page_source(&self) -> BrowserResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ScriptFailed(format!("Failed to get HTML content: {e}")))
    }

    async fn body_text(&self) -> BrowserResult<String> {
        let value = self
            .eval("document.body ? document.body.innerText : ''".to_string())
            .await?;

        let text = if let Value::String(text) = value {
            text
        } else {
            String::new()
        };

        // SPAs can leave innerText empty while the DOM is populated
        if text.trim().is_empty() {
            let html = self.page_source().await?;
            return Ok(html2md::parse_html(&html));
        }

        Ok(text)
    }

    async fn count(&self, selector: &str) -> BrowserResult<usize> {
        let value = self
            .eval(format!(
                "document.querySelectorAll({}).length",
                js_string(selector)
            ))
            .await?;

        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| BrowserError::ScriptFailed(format!("Non-numeric count for '{selector}': {value}")))
    }

    async fn links(&self, selector: &str) -> BrowserResult<Vec<LinkInfo>> {
        let value = self
            .eval(format!(
                "JSON.stringify(Array.from(document.querySelectorAll({})).map(el => ({{ \
                   href: el.hasAttribute('href') ? el.href : null, \
                   text: (el.innerText || '').trim() \
                 }})))",
                js_string(selector)
            ))
            .await?;

        let Value::String(json) = value else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&json)
            .map_err(|e| BrowserError::ScriptFailed(format!("Failed to decode links for '{selector}': {e}")))
    }

    async fn ready_state(&self) -> BrowserResult<String> {
        let value = self.eval("document.readyState".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn screenshot(&self) -> BrowserResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        self.page
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
    }
}
