//! `/projects` suite: page load, content visibility and navigation links

use crate::Config;
use crate::diagnostics::{Probe, survey};
use crate::document::LinkInfo;
use crate::suite::check::{ensure, ensure_contains, ensure_greater};
use crate::suite::{Case, CaseResult, Suite, SuiteContext};

pub const NAME: &str = "projects";

/// Selectors any rendered projects listing should hit
pub const CONTENT_PROBES: &[Probe] = &[
    Probe::new("div[class*='project']", "div[class*='project']"),
    Probe::new("section", "section"),
    Probe::new("article", "article"),
    Probe::new("div[class*='card']", "div[class*='card']"),
    Probe::new("div[class*='container']", "div[class*='container']"),
    Probe::new("main", "main"),
    Probe::new("h1", "h1"),
    Probe::new("h2", "h2"),
    Probe::new("h3", "h3"),
];

pub const NAVIGATION_SELECTORS: &[&str] = &["nav a", "header a", "a[href='/']", "a[href*='home']", "button"];

/// Number of candidates inspected for a same-site link
const LINKS_INSPECTED: usize = 3;

pub fn suite(config: &Config) -> Suite {
    Suite::new(NAME, "PROJECTS PAGE", config.projects.path.clone())
        .case(Case {
            name: "test_01_projects_page_loads",
            title: "TEST CASE 1: Projects Page Load",
            success: "Projects page loaded successfully",
            error_capture: "test_01_projects_page",
            run: |ctx| Box::pin(projects_page_loads(ctx)),
        })
        .case(Case {
            name: "test_02_projects_content_visible",
            title: "TEST CASE 2: Projects Content Visibility",
            success: "Projects content is visible",
            error_capture: "test_02_projects_content",
            run: |ctx| Box::pin(projects_content_visible(ctx)),
        })
        .case(Case {
            name: "test_03_projects_navigation_works",
            title: "TEST CASE 3: Projects Page Navigation",
            success: "Navigation elements exist",
            error_capture: "test_03_projects_nav",
            run: |ctx| Box::pin(projects_navigation_works(ctx)),
        })
}

/// Whether `href` stays on the application under test
pub fn is_same_site(href: &str, base_url: &str) -> bool {
    if href.starts_with('/') {
        return true;
    }
    match (url::Url::parse(href), url::Url::parse(base_url)) {
        (Ok(link), Ok(base)) => link.origin() == base.origin(),
        _ => false,
    }
}

/// First same-site link among the first few candidates
pub fn first_same_site_link<'a>(links: &'a [LinkInfo], base_url: &str) -> Option<&'a LinkInfo> {
    links
        .iter()
        .take(LINKS_INSPECTED)
        .find(|link| link.href.as_deref().is_some_and(|href| is_same_site(href, base_url)))
}

async fn projects_page_loads(ctx: &SuiteContext) -> CaseResult {
    let path = &ctx.config.projects.path;
    ctx.open().await?;

    let current_url = ctx.doc().current_url().await?;
    ctx.reporter.step(format!("Current URL: {current_url}"));
    ensure_contains(&current_url, path, &format!("URL should contain '{path}'"))?;

    let title = ctx.doc().title().await?;
    ctx.reporter
        .step(format!("Page Title: {}", title.as_deref().unwrap_or_default()));
    ensure(title.is_some(), "Page title should not be None")?;

    ctx.capture(&ctx.artifacts.timestamped("test_01_projects_page"))
        .await;
    Ok(())
}

async fn projects_content_visible(ctx: &SuiteContext) -> CaseResult {
    ctx.open().await?;
    ctx.reporter.step("Checking for page content...");

    let found = survey(ctx.doc(), CONTENT_PROBES).await;
    for (selector, count) in &found.found {
        ctx.reporter
            .found(format!("Found {count} elements matching '{selector}'"));
    }
    ensure_greater(found.kinds(), 0, "Should find some content elements")?;

    let source = ctx.doc().page_source().await?;
    let size = source.chars().count();
    let has_content = size > ctx.config.projects.min_source_len;
    ctx.reporter
        .step(format!("Page has content: {has_content} (size: {size} chars)"));

    ctx.capture(&ctx.artifacts.timestamped("test_02_projects_content"))
        .await;
    Ok(())
}

async fn projects_navigation_works(ctx: &SuiteContext) -> CaseResult {
    ctx.open().await?;
    ctx.reporter.step("Looking for navigation elements...");

    let mut nav_links = Vec::new();
    for selector in NAVIGATION_SELECTORS {
        match ctx.doc().links(selector).await {
            Ok(links) if !links.is_empty() => {
                ctx.reporter.found(format!(
                    "Found {} navigation elements: {selector}",
                    links.len()
                ));
                nav_links.extend(links);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(selector, "navigation probe skipped: {e}"),
        }
    }

    if !nav_links.is_empty() {
        ctx.reporter
            .step(format!("Total navigation elements found: {}", nav_links.len()));
        if let Some(link) = first_same_site_link(&nav_links, &ctx.config.base_url) {
            ctx.reporter.step(format!(
                "  Testing link: '{}' -> {}",
                link.text,
                link.href.as_deref().unwrap_or_default()
            ));
        }
    }

    ctx.capture(&ctx.artifacts.timestamped("test_03_projects_nav"))
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fake::FakeDocument;
    use crate::poller::ManualClock;
    use crate::suite::testing::context;
    use crate::suite::CaseOutcome;
    use std::sync::Arc;

    fn link(href: Option<&str>, text: &str) -> LinkInfo {
        LinkInfo {
            href: href.map(str::to_string),
            text: text.to_string(),
        }
    }

    #[test]
    fn same_site_links() {
        let base = "http://localhost:3000";
        assert!(is_same_site("/", base));
        assert!(is_same_site("http://localhost:3000/services", base));
        assert!(!is_same_site("https://wa.me/923001234567", base));
        assert!(!is_same_site("http://localhost:4000/", base));
        assert!(!is_same_site("mailto:info@example.com", base));
    }

    #[test]
    fn only_the_first_three_candidates_are_inspected() {
        let base = "http://localhost:3000";
        let links = vec![
            link(None, "Menu"),
            link(Some("https://facebook.com/shop"), "Facebook"),
            link(Some("http://localhost:3000/"), "Home"),
            link(Some("http://localhost:3000/about"), "About"),
        ];
        assert_eq!(first_same_site_link(&links, base).map(|l| l.text.as_str()), Some("Home"));

        let offsite_first = vec![
            link(None, "Menu"),
            link(Some("https://facebook.com/shop"), "Facebook"),
            link(Some("https://instagram.com/shop"), "Instagram"),
            link(Some("http://localhost:3000/about"), "About"),
        ];
        assert!(first_same_site_link(&offsite_first, base).is_none());
    }

    fn projects_page() -> FakeDocument {
        FakeDocument::new()
            .with_body("Our Projects\nLuxury Villa Solar Installation\nShopping Mall Solar Project")
            .with_source(&"<section><h3>Project</h3></section>".repeat(50))
            .with_count("section", 5)
            .with_count("h1", 2)
            .with_count("h3", 6)
            .with_links("nav a", vec![link(Some("http://localhost:3000/"), "Home")])
            .with_links("button", vec![link(None, "Get Quote")])
    }

    #[tokio::test]
    async fn rendered_projects_page_passes() {
        let config = Config::default();
        let suite = suite(&config);
        let ctx = context(Arc::new(projects_page()), Arc::new(ManualClock::new()), config, "/projects");

        let report = suite.run(&ctx).await;

        assert!(report.is_success(), "{report:?}");
        assert_eq!(report.total(), 3);
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }

    #[tokio::test]
    async fn empty_listing_fails_content_case_only() {
        let config = Config::default();
        let suite = suite(&config);
        let doc = FakeDocument::new().with_body("404 | This page could not be found.");
        let ctx = context(Arc::new(doc), Arc::new(ManualClock::new()), config, "/projects");

        let report = suite.run(&ctx).await;

        let outcomes: Vec<_> = report.cases.iter().map(|c| (c.name, c.outcome.is_passed())).collect();
        assert_eq!(
            outcomes,
            vec![
                ("test_01_projects_page_loads", true),
                ("test_02_projects_content_visible", false),
                ("test_03_projects_navigation_works", true),
            ]
        );
        assert!(matches!(report.cases[1].outcome, CaseOutcome::Failed(_)));
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }

    #[tokio::test]
    async fn untitled_page_fails_load_case() {
        let doc = FakeDocument {
            title: None,
            ..projects_page()
        };
        let ctx = context(Arc::new(doc), Arc::new(ManualClock::new()), Config::default(), "/projects");

        let report = suite(&ctx.config).run(&ctx).await;

        assert_eq!(
            report.cases[0].outcome,
            CaseOutcome::Failed("Page title should not be None".to_string())
        );
        assert_eq!(report.passed(), 2);
        std::fs::remove_dir_all(ctx.artifacts.dir()).ok();
    }
}
