//! Shared constants for suite plumbing

use std::time::Duration;

/// Poll cadence while waiting for `document.readyState` after navigation
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Characters of body text echoed to the console as a page preview
pub const PREVIEW_CHARS: usize = 500;

/// Width of the banner rules printed around suites and cases
pub const RULE_WIDTH: usize = 80;
