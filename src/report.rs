//! Human-readable console output
//!
//! Progress and summaries go to stdout for whoever is watching the run.
//! Nothing here is meant to be machine-parsed; structured diagnostics go
//! through `tracing` instead.

use chrono::Local;

use crate::suite::{CaseOutcome, SuiteReport};
use crate::utils::constants::RULE_WIDTH;

#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    enabled: bool,
}

impl Reporter {
    pub fn stdout() -> Self {
        Self { enabled: true }
    }

    /// Reporter that prints nothing
    pub fn silent() -> Self {
        Self { enabled: false }
    }

    fn line(&self, text: impl AsRef<str>) {
        if self.enabled {
            println!("{}", text.as_ref());
        }
    }

    pub fn suite_banner(&self, title: &str, target_url: &str, extra: &[(&str, String)]) {
        self.line(format!("\n{}", "=".repeat(RULE_WIDTH)));
        self.line(title);
        self.line("=".repeat(RULE_WIDTH));
        self.line("\n✅ Browser: Chrome");
        self.line(format!("✅ Test URL: {target_url}"));
        for (label, value) in extra {
            self.line(format!("✅ {label}: {value}"));
        }
        self.line(format!(
            "✅ Start Time: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
    }

    pub fn suite_end(&self) {
        self.line(format!("\n{}", "=".repeat(RULE_WIDTH)));
        self.line(format!("✅ End Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
        self.line(format!("{}\n", "=".repeat(RULE_WIDTH)));
    }

    pub fn case_header(&self, title: &str) {
        self.line(format!("\n{}", "-".repeat(RULE_WIDTH)));
        self.line(title);
        self.line("-".repeat(RULE_WIDTH));
    }

    /// `→ message`
    pub fn step(&self, message: impl AsRef<str>) {
        self.line(format!("→ {}", message.as_ref()));
    }

    /// `  ✓ message`
    pub fn found(&self, message: impl AsRef<str>) {
        self.line(format!("  ✓ {}", message.as_ref()));
    }

    /// `  ⏳ message`
    pub fn waiting(&self, message: impl AsRef<str>) {
        self.line(format!("  ⏳ {}", message.as_ref()));
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.line(format!("⚠️  {}", message.as_ref()));
    }

    /// Block of text between short rules
    pub fn excerpt(&self, text: &str) {
        self.line("-".repeat(40));
        self.line(text);
        self.line("-".repeat(40));
    }

    pub fn outcome(&self, outcome: &CaseOutcome, success_message: &str) {
        match outcome {
            CaseOutcome::Passed => self.line(format!("✅ TEST PASSED: {success_message}\n")),
            CaseOutcome::Failed(reason) => self.line(format!("❌ TEST FAILED: {reason}")),
            CaseOutcome::Errored(fault) => self.line(format!("❌ TEST ERROR: {fault}")),
        }
    }

    pub fn summary(&self, report: &SuiteReport) {
        self.line(format!("\n{}", "=".repeat(RULE_WIDTH)));
        self.line(format!("TEST SUMMARY - {}", report.title));
        self.line("=".repeat(RULE_WIDTH));
        self.line(format!("Total Tests: {}", report.total()));
        self.line(format!("Passed: {}", report.passed()));
        self.line(format!("Failed: {}", report.failed()));
        self.line(format!("Errors: {}", report.errored()));
        self.line(format!("{}\n", "=".repeat(RULE_WIDTH)));
    }
}
