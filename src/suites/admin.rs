//! `/backendadmin` suite: page load, database connection status, interface
//! elements and connection stability

use std::time::Duration;
use tracing::{info, warn};

use crate::Config;
use crate::diagnostics::{Probe, preview, scan_error_keywords, survey};
use crate::poller::{PagePoller, PollConfig};
use crate::suite::check::{ensure, ensure_contains, ensure_eq, ensure_greater};
use crate::suite::{Case, CaseError, CaseResult, Suite, SuiteContext};
use crate::utils::constants::PREVIEW_CHARS;

pub const NAME: &str = "backend_admin";

/// Element kinds an admin dashboard is expected to render
pub const INTERFACE_PROBES: &[Probe] = &[
    Probe::new("navigation", "nav, header, aside, .sidebar, .menu"),
    Probe::new("buttons", "button"),
    Probe::new("links", "a"),
    Probe::new("inputs", "input"),
    Probe::new("tables", "table"),
    Probe::new("divs", "div"),
];

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

pub fn suite(config: &Config) -> Suite {
    let admin = &config.admin;
    Suite::new(NAME, "BACKEND ADMIN PAGE (MongoDB Connection)", admin.path.clone())
        .detail("MongoDB Wait Time", format!("{}s", admin.connection_timeout_secs))
        .case(Case {
            name: "test_01_admin_page_loads",
            title: "TEST CASE 1: Backend Admin Page Load",
            success: "Backend admin page loaded successfully",
            error_capture: "test_01_admin_page",
            run: |ctx| Box::pin(admin_page_loads(ctx)),
        })
        .case(Case {
            name: "test_02_mongodb_connection_status",
            title: "TEST CASE 2: MongoDB Connection Status Check",
            success: "MongoDB connection status displayed",
            error_capture: "test_02_mongodb",
            run: |ctx| Box::pin(mongodb_connection_status(ctx)),
        })
        .case(Case {
            name: "test_03_admin_interface_elements",
            title: "TEST CASE 3: Admin Interface Elements Check",
            success: "Admin interface elements found",
            error_capture: "test_03_admin_elements",
            run: |ctx| Box::pin(admin_interface_elements(ctx)),
        })
        .case(Case {
            name: "test_04_mongodb_connection_stability",
            title: "TEST CASE 4: MongoDB Connection Stability",
            success: "Connection appears stable",
            error_capture: "test_04_stability",
            run: |ctx| Box::pin(mongodb_connection_stability(ctx)),
        })
}

async fn admin_page_loads(ctx: &SuiteContext) -> CaseResult {
    let admin = &ctx.config.admin;
    ctx.open().await?;

    let current_url = ctx.doc().current_url().await?;
    ctx.reporter.step(format!("Current URL: {current_url}"));
    ensure_contains(&current_url, &admin.path, &format!("URL should contain '{}'", admin.path))?;

    let title = ctx.doc().title().await?;
    ctx.reporter
        .step(format!("Page Title: {}", title.as_deref().unwrap_or_default()));
    ensure(title.is_some(), "Page title should not be None")?;

    let source = ctx.doc().page_source().await?;
    ctx.reporter
        .step(format!("Page Source Length: {} characters", source.chars().count()));
    ensure_greater(source.chars().count(), admin.min_source_len, "Page should have content")?;

    ctx.capture(&ctx.artifacts.timestamped("test_01_admin_page")).await;
    Ok(())
}

async fn mongodb_connection_status(ctx: &SuiteContext) -> CaseResult {
    let admin = &ctx.config.admin;
    let target = admin.connection_text.as_str();
    ctx.open().await?;

    ctx.reporter
        .step("Page loaded, checking for MongoDB connection status...");
    ctx.reporter.waiting(format!(
        "Waiting up to {}s for MongoDB connection...",
        admin.connection_timeout_secs
    ));
    ctx.reporter.step(format!("Looking for: '{target}'"));

    let config = PollConfig::new(secs(admin.connection_timeout_secs), secs(admin.poll_interval_secs))
        .with_checkpoints(secs(admin.checkpoint_secs));
    let result = PagePoller::new(ctx.doc(), ctx.clock(), config)
        .with_checkpoints(&ctx.artifacts, "mongodb_status")
        .poll_for(target)
        .await;

    let total_wait = result.elapsed.as_secs();
    info!(state = ?result.state(), total_wait, "connection status poll finished");
    ctx.reporter.step(format!("Total wait time: {total_wait}s"));
    ctx.capture(&ctx.artifacts.timestamped("test_02_mongodb_status"))
        .await;

    let full_text = ctx.doc().body_text().await.unwrap_or_default();
    ctx.reporter.step("Page Content Preview:");
    ctx.reporter.excerpt(preview(&full_text, PREVIEW_CHARS));

    match &result.matched_text {
        Some(matched) => {
            ctx.reporter.found(format!("Found: '{matched}'"));
            Ok(())
        }
        None => Err(CaseError::assertion(format!(
            "Expected text '{target}' not found after {total_wait}s"
        ))),
    }
}

async fn admin_interface_elements(ctx: &SuiteContext) -> CaseResult {
    ctx.open().await?;
    ctx.reporter.step("Checking for admin interface elements...");

    let found = survey(ctx.doc(), INTERFACE_PROBES).await;
    for (label, count) in &found.found {
        ctx.reporter.found(format!("{label}: {count}"));
    }
    ctx.reporter
        .step(format!("Total element types found: {}", found.kinds()));
    ctx.reporter.step(format!("Total elements: {}", found.total()));

    ensure_greater(found.kinds(), 0, "Should find some admin interface elements")?;

    ctx.capture(&ctx.artifacts.timestamped("test_03_admin_elements"))
        .await;
    Ok(())
}

async fn mongodb_connection_stability(ctx: &SuiteContext) -> CaseResult {
    let admin = &ctx.config.admin;
    ctx.open().await?;

    ctx.reporter.step("Waiting for initial MongoDB connection...");
    let settle = PollConfig::new(secs(admin.settle_secs), secs(admin.poll_interval_secs));
    let settled = PagePoller::new(ctx.doc(), ctx.clock(), settle)
        .poll_for(&admin.connection_text)
        .await;
    if !settled.found {
        ctx.reporter
            .warn("Connection status not shown yet, continuing with stability check");
    }

    ctx.capture(&ctx.artifacts.timestamped_short("stability_initial"))
        .await;
    let initial_text = ctx.doc().body_text().await?;
    let initial_url = ctx.doc().current_url().await?;
    ctx.reporter.step(format!("Initial URL: {initial_url}"));
    ctx.reporter.step(format!(
        "Initial content length: {} chars",
        initial_text.chars().count()
    ));

    ctx.reporter.step(format!(
        "Waiting additional {} seconds to verify stability...",
        admin.stability_window_secs
    ));
    ctx.clock().sleep(secs(admin.stability_window_secs)).await;

    ctx.capture(&ctx.artifacts.timestamped_short("stability_after"))
        .await;
    let after_text = ctx.doc().body_text().await?;
    let after_url = ctx.doc().current_url().await?;
    ctx.reporter.step(format!("After URL: {after_url}"));
    ctx.reporter.step(format!(
        "After content length: {} chars",
        after_text.chars().count()
    ));

    ensure_eq(&initial_url, &after_url, "URL should remain stable")?;

    let hits = scan_error_keywords(&after_text);
    if hits.is_empty() {
        ctx.reporter.found("No error keywords detected");
    } else {
        ctx.reporter.warn("Warning: Error keywords detected in page");
        for hit in &hits {
            warn!(keyword = hit.keyword, context = %hit.context, "error keyword on admin page");
            ctx.reporter.step(format!("  Context: ...{}...", hit.context));
        }
    }

    ensure_greater(
        after_text.chars().count(),
        admin.min_text_len,
        "Page should still have content",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fake::{BodyFrame, FakeDocument};
    use crate::poller::ManualClock;
    use crate::suite::testing::context;
    use crate::suite::{CaseOutcome, SuiteReport};
    use std::sync::Arc;

    const DASHBOARD: &str = "Backend Admin Dashboard\n\
        Manage your Categories, Products, and Orders (15 API endpoints)\n\
        MongoDB Connection Status\n";

    fn dashboard(status: &str) -> String {
        format!("{DASHBOARD}{status}\nCategories\nProducts\nOrders\nMedia\nSearch")
    }

    fn admin_page(frames: Vec<BodyFrame>) -> FakeDocument {
        FakeDocument::new()
            .with_frames(frames)
            .with_source(&format!("<html><body>{}</body></html>", "<div class=\"card\"></div>".repeat(40)))
            .with_count("button", 4)
            .with_count("a", 9)
            .with_count("div", 120)
    }

    async fn run(doc: FakeDocument) -> (SuiteReport, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let config = Config::default();
        let suite = suite(&config);
        let ctx = context(Arc::new(doc), clock.clone(), config, "/backendadmin");
        let report = suite.run(&ctx).await;
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
        (report, clock)
    }

    fn outcome<'a>(report: &'a SuiteReport, name: &str) -> &'a CaseOutcome {
        &report.cases.iter().find(|c| c.name == name).unwrap().outcome
    }

    #[tokio::test]
    async fn healthy_backend_passes_every_case() {
        let doc = admin_page(vec![BodyFrame::Text(dashboard("Connected to MongoDB Atlas"))]);

        let (report, _) = run(doc).await;

        assert!(report.is_success(), "{report:?}");
        assert_eq!(report.total(), 4);
    }

    #[tokio::test]
    async fn missing_status_fails_only_the_status_case() {
        let doc = admin_page(vec![BodyFrame::Text(dashboard("Checking connection..."))]);

        let (report, _) = run(doc).await;

        assert_eq!(
            outcome(&report, "test_02_mongodb_connection_status"),
            &CaseOutcome::Failed(
                "Expected text 'Connected to MongoDB Atlas' not found after 30s".to_string()
            )
        );
        assert_eq!(report.passed(), 3);
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn error_keywords_only_warn() {
        let doc = admin_page(vec![BodyFrame::Text(dashboard(
            "Connection failed - check .env MONGO_URI",
        ))]);

        let (report, _) = run(doc).await;

        assert_eq!(
            outcome(&report, "test_04_mongodb_connection_stability"),
            &CaseOutcome::Passed
        );
    }

    #[tokio::test]
    async fn status_poll_uses_the_configured_budget() {
        let doc = admin_page(vec![BodyFrame::Text(dashboard("Checking connection..."))]);
        let clock = Arc::new(ManualClock::new());
        let config = Config::default();
        let ctx = context(Arc::new(doc), clock.clone(), config, "/backendadmin");

        let result = mongodb_connection_status(&ctx).await;

        assert!(matches!(result, Err(CaseError::Assertion(_))));
        assert_eq!(clock.elapsed(), Duration::from_secs(30));
        assert!(ctx.artifacts.named("mongodb_status_10s.png").exists());
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }

    #[tokio::test]
    async fn blank_dashboard_fails_interface_check() {
        let doc = FakeDocument::new().with_body("Loading");
        let clock = Arc::new(ManualClock::new());
        let ctx = context(Arc::new(doc), clock, Config::default(), "/backendadmin");

        let err = admin_interface_elements(&ctx).await.unwrap_err();

        assert!(err.is_assertion());
        assert!(err.to_string().contains("Should find some admin interface elements"));
    }

    #[tokio::test]
    async fn unreachable_app_errors_instead_of_failing() {
        let doc = FakeDocument {
            fail_goto: true,
            ..FakeDocument::new()
        };

        let (report, _) = run(doc).await;

        assert_eq!(report.errored(), 4);
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn short_page_source_fails_load_case() {
        let doc = FakeDocument::new()
            .with_body(&dashboard("Connected to MongoDB Atlas"))
            .with_source("<html></html>");
        let ctx = context(Arc::new(doc), Arc::new(ManualClock::new()), Config::default(), "/backendadmin");

        let err = admin_page_loads(&ctx).await.unwrap_err();

        assert!(err.to_string().ends_with("Page should have content"));
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }

    #[tokio::test]
    async fn blank_page_fails_every_case() {
        let doc = FakeDocument::new()
            .with_body("")
            .with_source("<html><head></head><body></body></html>");
        let clock = Arc::new(ManualClock::new());
        let config = Config::default();
        let suite = suite(&config);
        let ctx = context(Arc::new(doc), clock.clone(), config, "/backendadmin");

        let report = suite.run(&ctx).await;

        assert_eq!(report.failed(), 4, "{report:?}");
        assert_eq!(report.errored(), 0);
        assert!(matches!(
            outcome(&report, "test_01_admin_page_loads"),
            CaseOutcome::Failed(reason) if reason.ends_with("Page should have content")
        ));
        assert_eq!(
            outcome(&report, "test_02_mongodb_connection_status"),
            &CaseOutcome::Failed(
                "Expected text 'Connected to MongoDB Atlas' not found after 30s".to_string()
            )
        );
        // 30s status poll, 10s settle poll, 10s stability window
        assert_eq!(clock.elapsed(), Duration::from_secs(50));
        assert!(ctx.artifacts.named("test_02_mongodb_ERROR.png").exists());
        assert!(ctx.artifacts.named("test_04_stability_ERROR.png").exists());
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }

    #[tokio::test]
    async fn url_change_during_stability_window_fails() {
        let doc = admin_page(vec![BodyFrame::Text(dashboard("Connected to MongoDB Atlas"))])
            .with_url_script(&["http://localhost:3000/backendadmin", "http://localhost:3000/login"]);
        let ctx = context(Arc::new(doc), Arc::new(ManualClock::new()), Config::default(), "/backendadmin");

        let err = mongodb_connection_stability(&ctx).await.unwrap_err();

        assert!(err.is_assertion());
        assert!(err.to_string().ends_with("URL should remain stable"), "{err}");
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }
}
