//! Suite runner
//!
//! A [`Suite`] is a named list of cases sharing one browser session. Cases run
//! sequentially in name order against the same [`SuiteContext`]; a failed or
//! errored case stops only itself. The session is released after the last
//! case whatever the outcomes were.

pub mod check;
mod outcome;

pub use outcome::{CaseError, CaseOutcome, CaseReport, CaseResult, SuiteReport};

use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::Config;
use crate::artifacts::ArtifactStore;
use crate::browser::{BrowserError, BrowserResult};
use crate::document::Document;
use crate::poller::{Clock, PollConfig, TokioClock};
use crate::report::Reporter;
use crate::session::BrowserSession;
use crate::utils::constants::READY_POLL_INTERVAL;
use crate::utils::wait_until;

pub type CaseFn = for<'a> fn(&'a SuiteContext) -> BoxFuture<'a, CaseResult>;

#[derive(Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub title: &'static str,
    /// Printed when the case passes
    pub success: &'static str,
    /// Prefix of the `<prefix>_ERROR.png` capture taken when the case does not pass
    pub error_capture: &'static str,
    pub run: CaseFn,
}

pub struct Suite {
    pub name: &'static str,
    pub title: &'static str,
    pub path: String,
    /// Extra `label: value` lines for the suite banner
    pub details: Vec<(&'static str, String)>,
    cases: Vec<Case>,
}

impl Suite {
    pub fn new(name: &'static str, title: &'static str, path: impl Into<String>) -> Self {
        Self {
            name,
            title,
            path: path.into(),
            details: Vec::new(),
            cases: Vec::new(),
        }
    }

    #[must_use]
    pub fn detail(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.details.push((label, value.into()));
        self
    }

    #[must_use]
    pub fn case(mut self, case: Case) -> Self {
        self.cases.push(case);
        self
    }

    /// Cases in execution order (sorted by name)
    pub fn cases(&self) -> Vec<&Case> {
        let mut cases: Vec<&Case> = self.cases.iter().collect();
        cases.sort_by_key(|c| c.name);
        cases
    }

    /// Run every case against `ctx`
    pub async fn run(&self, ctx: &SuiteContext) -> SuiteReport {
        ctx.reporter
            .suite_banner(&format!("SMOKE TEST - {}", self.title), &ctx.target_url, &self.details);

        let mut reports = Vec::with_capacity(self.cases.len());
        for case in self.cases() {
            ctx.reporter.case_header(case.title);
            info!(suite = self.name, case = case.name, "case started");
            let started = ctx.clock.now();

            let result = AssertUnwindSafe((case.run)(ctx))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(CaseError::Other(anyhow::anyhow!(panic_message(panic.as_ref())))));

            let outcome = CaseOutcome::from_result(&result);
            if !outcome.is_passed() {
                let path = ctx.artifacts.named(&format!("{}_ERROR.png", case.error_capture));
                ctx.capture(&path).await;
            }
            match &outcome {
                CaseOutcome::Passed => info!(case = case.name, "case passed"),
                CaseOutcome::Failed(reason) => warn!(case = case.name, %reason, "case failed"),
                CaseOutcome::Errored(fault) => error!(case = case.name, %fault, "case errored"),
            }
            ctx.reporter.outcome(&outcome, case.success);

            reports.push(CaseReport {
                name: case.name,
                outcome,
                duration: ctx.clock.since(started),
            });
        }

        ctx.reporter.suite_end();

        SuiteReport {
            name: self.name,
            title: self.title,
            cases: reports,
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("case panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("case panicked: {s}")
    } else {
        "case panicked".to_string()
    }
}

/// Everything a case needs, passed explicitly instead of living in globals
pub struct SuiteContext {
    pub document: Arc<dyn Document>,
    pub clock: Arc<dyn Clock>,
    pub artifacts: ArtifactStore,
    pub config: Arc<Config>,
    pub reporter: Reporter,
    /// Absolute URL of the page under test
    pub target_url: String,
}

impl SuiteContext {
    pub fn doc(&self) -> &dyn Document {
        self.document.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Navigate to the page under test and wait until it is ready
    pub async fn open(&self) -> BrowserResult<()> {
        self.reporter.step(format!("Navigating to: {}", self.target_url));
        self.doc().goto(&self.target_url).await?;
        self.reporter.step("Waiting for page to load...");
        self.wait_ready().await
    }

    /// Wait for `document.readyState == "complete"`
    ///
    /// A page that never settles is not an error here: the case carries on
    /// and its own checks decide the outcome.
    pub async fn wait_ready(&self) -> BrowserResult<()> {
        let config = PollConfig::new(self.config.page_load_timeout(), READY_POLL_INTERVAL);
        let doc = self.doc();
        let waited = wait_until(self.clock(), config, "document ready", || async move {
            Ok(doc.ready_state().await? == "complete")
        })
        .await;

        match waited {
            Ok(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "page ready"),
            Err(BrowserError::WaitTimeout { timeout, .. }) => {
                warn!(?timeout, "page still loading, continuing");
                self.reporter
                    .warn(format!("Page still loading after {}s, continuing", timeout.as_secs()));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Screenshot to `path`; failures are logged, never raised
    pub async fn capture(&self, path: &std::path::Path) -> Option<PathBuf> {
        let saved = self.artifacts.try_capture(self.doc(), path).await;
        if let Some(saved) = &saved {
            self.reporter.step(format!("Screenshot saved: {}", saved.display()));
        }
        saved
    }
}

/// Join the configured base URL with a suite path
pub fn target_url(base_url: &str, path: &str) -> anyhow::Result<String> {
    let base = url::Url::parse(base_url).with_context(|| format!("Invalid base URL '{base_url}'"))?;
    let joined = base
        .join(path)
        .with_context(|| format!("Cannot join '{path}' onto '{base_url}'"))?;
    Ok(joined.to_string())
}

/// Acquire a browser session, run `suite`, then release the session
///
/// Only failing to start the suite is an `Err`; case failures are reported in
/// the returned [`SuiteReport`].
pub async fn run_suite(suite: &Suite, config: &Arc<Config>) -> anyhow::Result<SuiteReport> {
    let target_url = target_url(&config.base_url, &suite.path)?;
    let reporter = Reporter::stdout();

    let mut session = BrowserSession::acquire(&config.browser)
        .await
        .with_context(|| format!("Failed to start browser for suite '{}'", suite.name))?;

    let ctx = SuiteContext {
        document: Arc::new(session.document().clone()),
        clock: Arc::new(TokioClock),
        artifacts: ArtifactStore::new(config.artifacts_dir.clone()),
        config: config.clone(),
        reporter,
        target_url,
    };

    let report = suite.run(&ctx).await;
    drop(ctx);

    session.shutdown().await?;
    reporter.summary(&report);
    Ok(report)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::artifacts::scratch_store;
    use crate::poller::ManualClock;

    pub(crate) fn context(document: Arc<dyn Document>, clock: Arc<ManualClock>, config: Config, path: &str) -> SuiteContext {
        let target_url = target_url(&config.base_url, path).unwrap();
        SuiteContext {
            document,
            clock,
            artifacts: scratch_store(),
            config: Arc::new(config),
            reporter: Reporter::silent(),
            target_url,
        }
    }
}
