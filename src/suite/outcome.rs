use std::time::Duration;
use thiserror::Error;

use crate::browser::BrowserError;

/// Why a case stopped early
///
/// An [`Assertion`](CaseError::Assertion) is an expected condition that did
/// not hold and marks the case failed. Every other variant is a fault and
/// marks it errored.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("{0}")]
    Assertion(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaseError {
    pub fn assertion(message: impl Into<String>) -> Self {
        CaseError::Assertion(message.into())
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, CaseError::Assertion(_))
    }
}

pub type CaseResult<T = ()> = Result<T, CaseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    Errored(String),
}

impl CaseOutcome {
    pub fn from_result(result: &CaseResult) -> Self {
        match result {
            Ok(()) => CaseOutcome::Passed,
            Err(CaseError::Assertion(message)) => CaseOutcome::Failed(message.clone()),
            Err(fault) => CaseOutcome::Errored(format!("{fault:#}")),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: &'static str,
    pub outcome: CaseOutcome,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: &'static str,
    pub title: &'static str,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Errored(_)))
    }

    pub fn is_success(&self) -> bool {
        self.cases.iter().all(|c| c.outcome.is_passed())
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }
}
