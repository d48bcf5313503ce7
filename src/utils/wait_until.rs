//! Condition polling used in place of fixed sleeps
//!
//! Navigation waits for the document to report ready instead of sleeping a
//! fixed number of seconds. Errors from the condition are treated as
//! transient and polling continues.

use std::future::Future;
use std::time::Duration;

use crate::browser::{BrowserError, BrowserResult};
use crate::poller::{Clock, MIN_POLL_INTERVAL, PollConfig};

/// Poll `condition` until it yields `Ok(true)` or the timeout expires
///
/// # Returns
/// * `Ok(Duration)` - Elapsed time when the condition held
/// * `Err(BrowserError::WaitTimeout)` - Condition never held within the budget
pub async fn wait_until<F, Fut>(
    clock: &dyn Clock,
    config: PollConfig,
    description: &str,
    mut condition: F,
) -> BrowserResult<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BrowserResult<bool>>,
{
    let start = clock.now();
    let interval = config.interval.max(MIN_POLL_INTERVAL);

    loop {
        match condition().await {
            Ok(true) => return Ok(clock.since(start).min(config.timeout)),
            Ok(false) => {}
            Err(e) => tracing::debug!("wait for '{description}' saw transient error: {e}"),
        }

        let elapsed = clock.since(start);
        if elapsed >= config.timeout {
            return Err(BrowserError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        clock.sleep(interval.min(config.timeout - elapsed)).await;
    }
}
