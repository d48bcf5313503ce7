//! Page diagnostics that inform but never decide a case outcome
//!
//! - Error keyword scan with surrounding context
//! - Element surveys across a list of CSS probes
//! - Text previews for console output

use tracing::debug;

use crate::document::Document;

/// Words whose presence in page text suggests the backend is unhealthy
pub const ERROR_KEYWORDS: &[&str] = &["error", "failed", "timeout", "cannot connect", "refused"];

const CONTEXT_BEFORE: usize = 50;
const CONTEXT_AFTER: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub keyword: &'static str,
    /// Text around the first occurrence
    pub context: String,
}

/// Case-insensitive scan of `text` for [`ERROR_KEYWORDS`]
///
/// One hit per keyword, located at its first occurrence.
pub fn scan_error_keywords(text: &str) -> Vec<KeywordHit> {
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => *c,
            }
        })
        .collect();

    ERROR_KEYWORDS
        .iter()
        .filter_map(|&keyword| {
            let needle: Vec<char> = keyword.chars().collect();
            let idx = lowered.windows(needle.len()).position(|w| w == needle.as_slice())?;
            let from = idx.saturating_sub(CONTEXT_BEFORE);
            let to = (idx + CONTEXT_AFTER).min(chars.len());
            Some(KeywordHit {
                keyword,
                context: chars[from..to].iter().collect(),
            })
        })
        .collect()
}

/// First `max_chars` characters of `text`
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A labelled CSS probe
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub label: &'static str,
    pub selector: &'static str,
}

impl Probe {
    pub const fn new(label: &'static str, selector: &'static str) -> Self {
        Self { label, selector }
    }
}

/// Count of matching elements per probe label, in probe order
///
/// Probes with no matches are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSurvey {
    pub found: Vec<(&'static str, usize)>,
}

impl ElementSurvey {
    pub fn kinds(&self) -> usize {
        self.found.len()
    }

    pub fn total(&self) -> usize {
        self.found.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.found.iter().find(|(l, _)| *l == label).map(|(_, n)| *n)
    }
}

/// Run each probe; a probe whose lookup fails is skipped
pub async fn survey(document: &dyn Document, probes: &[Probe]) -> ElementSurvey {
    let mut survey = ElementSurvey::default();
    for probe in probes {
        match document.count(probe.selector).await {
            Ok(0) => {}
            Ok(n) => {
                survey.found.push((probe.label, n));
            }
            Err(e) => debug!(selector = probe.selector, "probe skipped: {e}"),
        }
    }
    survey
}
