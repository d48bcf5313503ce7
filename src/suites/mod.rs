//! Built-in smoke suites

pub mod admin;
pub mod projects;

use crate::Config;
use crate::suite::Suite;

/// Every suite, in the order they run by default
pub fn all(config: &Config) -> Vec<Suite> {
    vec![admin::suite(config), projects::suite(config)]
}

pub fn names() -> [&'static str; 2] {
    [admin::NAME, projects::NAME]
}

/// Suites matching `requested`, or all of them when nothing was requested
pub fn select(config: &Config, requested: &[String]) -> anyhow::Result<Vec<Suite>> {
    if requested.is_empty() {
        return Ok(all(config));
    }

    let mut available = all(config);
    let mut selected = Vec::with_capacity(requested.len());
    for name in requested {
        let Some(index) = available.iter().position(|s| s.name == name.as_str()) else {
            if selected.iter().any(|s: &Suite| s.name == name.as_str()) {
                continue;
            }
            anyhow::bail!(
                "Unknown suite '{name}' (available: {})",
                names().join(", ")
            );
        };
        selected.push(available.remove(index));
    }
    Ok(selected)
}
