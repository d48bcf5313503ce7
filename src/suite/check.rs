//! Assertion helpers returning [`CaseError::Assertion`]

use std::fmt::Debug;

use super::outcome::{CaseError, CaseResult};

pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(CaseError::assertion(message))
    }
}

pub fn ensure_contains(haystack: &str, needle: &str, message: &str) -> CaseResult {
    ensure(
        haystack.contains(needle),
        format!("'{needle}' not found in '{haystack}' : {message}"),
    )
}

pub fn ensure_greater(actual: usize, threshold: usize, message: &str) -> CaseResult {
    ensure(
        actual > threshold,
        format!("{actual} not greater than {threshold} : {message}"),
    )
}

pub fn ensure_eq<T: PartialEq + Debug>(left: &T, right: &T, message: &str) -> CaseResult {
    ensure(left == right, format!("{left:?} != {right:?} : {message}"))
}
