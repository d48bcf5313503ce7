//! Browser smoke tests for the storefront admin and projects pages
//!
//! Drives headless Chrome via chromiumoxide, polls rendered page text for
//! asynchronous status strings and reports per-case outcomes.

pub mod artifacts;
pub mod browser;
pub mod browser_setup;
pub mod diagnostics;
pub mod document;
pub mod poller;
pub mod report;
mod session;
pub mod suite;
pub mod suites;
mod utils;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the application under test is served
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory screenshots are written to
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// Upper bound for a navigation to reach `document.readyState == "complete"`
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub projects: ProjectsConfig,
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, etc.)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,

    /// CDP request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Settings for the `/backendadmin` suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_path")]
    pub path: String,

    /// Status line rendered once the backend reaches its database
    #[serde(default = "default_connection_text")]
    pub connection_text: String,

    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Interim screenshot cadence while polling; 0 disables
    #[serde(default = "default_checkpoint_secs")]
    pub checkpoint_secs: u64,

    /// Budget for the connection to come up before the stability snapshots
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Idle time between the two stability snapshots
    #[serde(default = "default_stability_window_secs")]
    pub stability_window_secs: u64,

    #[serde(default = "default_admin_min_source_len")]
    pub min_source_len: usize,

    #[serde(default = "default_admin_min_text_len")]
    pub min_text_len: usize,
}

/// Settings for the `/projects` suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default = "default_projects_path")]
    pub path: String,

    #[serde(default = "default_projects_min_source_len")]
    pub min_source_len: usize,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_artifacts_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_page_load_timeout_secs() -> u64 {
    20
}

fn default_headless() -> bool {
    true
}

fn default_disable_security() -> bool {
    false // SECURE BY DEFAULT
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_admin_path() -> String {
    "/backendadmin".to_string()
}
fn default_connection_text() -> String {
    "Connected to MongoDB Atlas".to_string()
}
fn default_connection_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_secs() -> u64 {
    2
}
fn default_checkpoint_secs() -> u64 {
    10
}
fn default_settle_secs() -> u64 {
    10
}
fn default_stability_window_secs() -> u64 {
    10
}
fn default_admin_min_source_len() -> usize {
    500
}
fn default_admin_min_text_len() -> usize {
    100
}

fn default_projects_path() -> String {
    "/projects".to_string()
}
fn default_projects_min_source_len() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            artifacts_dir: default_artifacts_dir(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            browser: BrowserConfig::default(),
            admin: AdminConfig::default(),
            projects: ProjectsConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: default_disable_security(),
            request_timeout_secs: default_request_timeout_secs(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            path: default_admin_path(),
            connection_text: default_connection_text(),
            connection_timeout_secs: default_connection_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            checkpoint_secs: default_checkpoint_secs(),
            settle_secs: default_settle_secs(),
            stability_window_secs: default_stability_window_secs(),
            min_source_len: default_admin_min_source_len(),
            min_text_len: default_admin_min_text_len(),
        }
    }
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            path: default_projects_path(),
            min_source_len: default_projects_min_source_len(),
        }
    }
}

impl Config {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    /// Reject settings the runner cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://, got '{}'", self.base_url);
        }
        url::Url::parse(&self.base_url)
            .with_context(|| format!("base_url '{}' is not a valid URL", self.base_url))?;
        if self.admin.poll_interval_secs == 0 {
            anyhow::bail!("admin.poll_interval_secs must be at least 1");
        }
        Ok(())
    }
}

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "SITE_SMOKE_CONFIG";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "SITE_SMOKE_BASE_URL";

/// Load config from `$SITE_SMOKE_CONFIG` or `config.yaml` in the working directory
///
/// `$SITE_SMOKE_BASE_URL` overrides `base_url` after parsing.
pub fn load_yaml_config() -> anyhow::Result<Config> {
    load_yaml_config_from(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        std::env::var(BASE_URL_ENV).ok(),
    )
}

/// Load config from `path` (default `config.yaml`), then apply `base_url_override`
///
/// A missing file yields the defaults. The result is validated after the
/// override so a bad override is rejected too.
pub fn load_yaml_config_from(
    path: Option<PathBuf>,
    base_url_override: Option<String>,
) -> anyhow::Result<Config> {
    let config_path = path.unwrap_or_else(|| PathBuf::from("config.yaml"));

    let mut config = if config_path.exists() {
        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        parse_yaml_config(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };

    if let Some(base_url) = base_url_override {
        config.base_url = base_url;
    }

    config.validate()?;
    Ok(config)
}

pub fn parse_yaml_config(contents: &str) -> anyhow::Result<Config> {
    Ok(serde_yaml::from_str(contents)?)
}

pub use artifacts::ArtifactStore;
pub use browser::{BrowserError, BrowserResult, BrowserWrapper};
pub use document::{ChromeDocument, Document, LinkInfo};
pub use poller::{Clock, MatchKind, PagePoller, PollConfig, PollResult, PollState, TokioClock};
pub use session::BrowserSession;
pub use suite::{CaseError, CaseOutcome, Suite, SuiteContext, SuiteReport, run_suite};
