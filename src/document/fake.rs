//! Scripted [`Document`] for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};

use super::{Document, LinkInfo};
use crate::browser::{BrowserError, BrowserResult};

/// Body text returned by successive `body_text` calls; the last entry repeats
pub(crate) enum BodyFrame {
    Text(String),
    Fail,
}

#[derive(Default)]
pub(crate) struct FakeDocument {
    pub url: Mutex<String>,
    /// URLs reported by successive `current_url` calls once navigation is done
    pub url_script: Mutex<VecDeque<String>>,
    pub title: Option<String>,
    pub source: String,
    pub frames: Mutex<VecDeque<BodyFrame>>,
    pub counts: HashMap<String, usize>,
    pub failing_selectors: HashSet<String>,
    pub links: HashMap<String, Vec<LinkInfo>>,
    pub fail_screenshots: bool,
    pub fail_goto: bool,
    /// `readyState` stays "loading" forever
    pub loading: bool,
    pub visited: Mutex<Vec<String>>,
    pub body_reads: Mutex<usize>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self {
            title: Some("Storefront".to_string()),
            ..Self::default()
        }
    }

    pub fn with_body(self, text: &str) -> Self {
        self.frames.lock().push_back(BodyFrame::Text(text.to_string()));
        self
    }

    pub fn with_frames(self, frames: Vec<BodyFrame>) -> Self {
        self.frames.lock().extend(frames);
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_count(mut self, selector: &str, count: usize) -> Self {
        self.counts.insert(selector.to_string(), count);
        self
    }

    pub fn with_failing_selector(mut self, selector: &str) -> Self {
        self.failing_selectors.insert(selector.to_string());
        self
    }

    pub fn with_links(mut self, selector: &str, links: Vec<LinkInfo>) -> Self {
        self.links.insert(selector.to_string(), links);
        self
    }

    pub fn with_url_script(self, urls: &[&str]) -> Self {
        self.url_script
            .lock()
            .extend(urls.iter().map(|u| u.to_string()));
        self
    }

    pub fn body_reads(&self) -> usize {
        *self.body_reads.lock()
    }
}

#[async_trait]
impl Document for FakeDocument {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        if self.fail_goto {
            return Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        self.visited.lock().push(url.to_string());
        *self.url.lock() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        let mut url = self.url.lock();
        if let Some(next) = self.url_script.lock().pop_front() {
            *url = next;
        }
        Ok(url.clone())
    }

    async fn title(&self) -> BrowserResult<Option<String>> {
        Ok(self.title.clone())
    }

    async fn page_source(&self) -> BrowserResult<String> {
        Ok(self.source.clone())
    }

    async fn body_text(&self) -> BrowserResult<String> {
        *self.body_reads.lock() += 1;
        let mut frames = self.frames.lock();
        let frame = if frames.len() > 1 {
            frames.pop_front()
        } else {
            None
        };
        let current = match &frame {
            Some(frame) => Some(frame),
            None => frames.front(),
        };
        match current {
            Some(BodyFrame::Text(text)) => Ok(text.clone()),
            Some(BodyFrame::Fail) => Err(BrowserError::ScriptFailed("body not attached".to_string())),
            None => Ok(String::new()),
        }
    }

    async fn count(&self, selector: &str) -> BrowserResult<usize> {
        if self.failing_selectors.contains(selector) {
            return Err(BrowserError::ScriptFailed(format!("invalid selector '{selector}'")));
        }
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    async fn links(&self, selector: &str) -> BrowserResult<Vec<LinkInfo>> {
        if self.failing_selectors.contains(selector) {
            return Err(BrowserError::ScriptFailed(format!("invalid selector '{selector}'")));
        }
        Ok(self.links.get(selector).cloned().unwrap_or_default())
    }

    async fn ready_state(&self) -> BrowserResult<String> {
        let state = if self.loading { "loading" } else { "complete" };
        Ok(state.to_string())
    }

    async fn screenshot(&self) -> BrowserResult<Vec<u8>> {
        if self.fail_screenshots {
            return Err(BrowserError::ScreenshotFailed("target closed".to_string()));
        }
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }
}
