// Smoke test runner binary
//
// Usage: site-smoke [SUITE...]
// Runs the named suites (all of them when none are given) against the
// configured base URL. Exits non-zero when any case fails or a suite cannot
// start.

use std::process::ExitCode;
use std::sync::Arc;

use site_smoke::{load_yaml_config, run_suite, suites};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<bool> {
    let config = Arc::new(load_yaml_config()?);
    let requested: Vec<String> = std::env::args().skip(1).collect();
    let selected = suites::select(&config, &requested)?;

    let mut all_passed = true;
    for suite in &selected {
        match run_suite(suite, &config).await {
            Ok(report) => all_passed &= report.is_success(),
            Err(e) => {
                error!(suite = suite.name, "{e:#}");
                all_passed = false;
            }
        }
    }
    Ok(all_passed)
}
