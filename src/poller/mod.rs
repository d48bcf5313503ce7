//! Text polling against a rendered page
//!
//! [`PagePoller`] samples `document.body` text until a target string appears
//! or the time budget runs out. Failing to read the body is treated the same
//! as the text being absent: the page may simply not have rendered yet.

mod clock;

pub use clock::{Clock, ManualClock, TokioClock};

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::document::Document;

/// Lower bound applied to the poll interval so a zero interval cannot spin
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total budget before declaring the poll unsuccessful
    pub timeout: Duration,
    /// Wait between unsuccessful samples
    pub interval: Duration,
    /// Interim screenshot cadence, if any
    pub checkpoint_every: Option<Duration>,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            checkpoint_every: None,
        }
    }

    #[must_use]
    pub fn with_checkpoints(mut self, every: Duration) -> Self {
        self.checkpoint_every = (!every.is_zero()).then_some(every);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    CaseInsensitive,
}

/// Terminal state of a finished poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Found,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub found: bool,
    pub matched_text: Option<String>,
    pub match_kind: Option<MatchKind>,
    /// Never exceeds the configured timeout
    pub elapsed: Duration,
}

impl PollResult {
    pub fn state(&self) -> PollState {
        if self.found {
            PollState::Found
        } else {
            PollState::TimedOut
        }
    }
}

/// Look for `target` in `text`: exact case first, then case-insensitive
///
/// The case-insensitive hit reports the lowercased target.
pub fn match_target(text: &str, target: &str) -> Option<(MatchKind, String)> {
    if text.contains(target) {
        return Some((MatchKind::Exact, target.to_string()));
    }
    let lowered = target.to_lowercase();
    if text.to_lowercase().contains(&lowered) {
        return Some((MatchKind::CaseInsensitive, lowered));
    }
    None
}

struct Checkpoints<'a> {
    store: &'a ArtifactStore,
    prefix: String,
}

pub struct PagePoller<'a> {
    document: &'a dyn Document,
    clock: &'a dyn Clock,
    config: PollConfig,
    checkpoints: Option<Checkpoints<'a>>,
}

impl<'a> PagePoller<'a> {
    pub fn new(document: &'a dyn Document, clock: &'a dyn Clock, config: PollConfig) -> Self {
        Self {
            document,
            clock,
            config,
            checkpoints: None,
        }
    }

    /// Write `<prefix>_<N>s.png` each time a checkpoint boundary is crossed
    #[must_use]
    pub fn with_checkpoints(mut self, store: &'a ArtifactStore, prefix: impl Into<String>) -> Self {
        self.checkpoints = Some(Checkpoints {
            store,
            prefix: prefix.into(),
        });
        self
    }

    /// Sample the page until `target` shows up or the timeout elapses
    ///
    /// The page is always sampled at least once, and once more when the
    /// deadline is reached, so a negative result is reported at exactly the
    /// timeout.
    pub async fn poll_for(&self, target: &str) -> PollResult {
        let PollConfig {
            timeout, interval, ..
        } = self.config;
        let interval = interval.max(MIN_POLL_INTERVAL);
        let start = self.clock.now();
        let mut next_checkpoint = self.config.checkpoint_every;

        loop {
            if let Some(result) = self.sample(target, start).await {
                return result;
            }

            let elapsed = self.clock.since(start);
            if elapsed >= timeout {
                info!(target, ?timeout, "target text not found before timeout");
                return PollResult {
                    found: false,
                    matched_text: None,
                    match_kind: None,
                    elapsed: timeout,
                };
            }

            if let (Some(due), Some(every)) = (next_checkpoint, self.config.checkpoint_every)
                && elapsed >= due
            {
                self.capture_checkpoint(elapsed).await;
                let mut due = due;
                while due <= elapsed {
                    due += every;
                }
                next_checkpoint = Some(due);
            }

            self.clock.sleep(interval.min(timeout - elapsed)).await;
        }
    }

    async fn sample(&self, target: &str, start: Instant) -> Option<PollResult> {
        let text = match self.document.body_text().await {
            Ok(text) => text,
            Err(e) => {
                debug!("body text unavailable, treating as not found yet: {e}");
                return None;
            }
        };

        let elapsed = self.clock.since(start);
        debug!(target, elapsed_secs = elapsed.as_secs(), "checking page text");

        let (kind, matched) = match_target(&text, target)?;
        info!(matched = %matched, ?kind, elapsed_secs = elapsed.as_secs_f64(), "target text found");
        Some(PollResult {
            found: true,
            matched_text: Some(matched),
            match_kind: Some(kind),
            elapsed: elapsed.min(self.config.timeout),
        })
    }

    async fn capture_checkpoint(&self, elapsed: Duration) {
        if let Some(checkpoints) = &self.checkpoints {
            let path = checkpoints
                .store
                .named(&format!("{}_{}s.png", checkpoints.prefix, elapsed.as_secs()));
            checkpoints.store.try_capture(self.document, &path).await;
        }
    }
}
