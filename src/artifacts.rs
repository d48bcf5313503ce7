//! Screenshot artifacts
//!
//! Captures are diagnostic only: they are written under the configured
//! directory with deterministic names and never read back.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::browser::BrowserResult;
use crate::document::Document;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<prefix>_<YYYYmmdd_HHMMSS>.png`
    pub fn timestamped(&self, prefix: &str) -> PathBuf {
        self.named(&format!("{prefix}_{}.png", Local::now().format("%Y%m%d_%H%M%S")))
    }

    /// `<prefix>_<HHMMSS>.png`
    pub fn timestamped_short(&self, prefix: &str) -> PathBuf {
        self.named(&format!("{prefix}_{}.png", Local::now().format("%H%M%S")))
    }

    pub fn named(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write a screenshot of `document` to `path`
    pub async fn capture(&self, document: &dyn Document, path: &Path) -> BrowserResult<PathBuf> {
        let bytes = document.screenshot().await?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(path, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "screenshot saved");
        Ok(path.to_path_buf())
    }

    /// Like [`capture`](Self::capture) but failures are only logged
    pub async fn try_capture(&self, document: &dyn Document, path: &Path) -> Option<PathBuf> {
        match self.capture(document, path).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %path.display(), "screenshot failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn scratch_store() -> ArtifactStore {
    ArtifactStore::new(std::env::temp_dir().join(format!("site_smoke_artifacts_{}", uuid::Uuid::new_v4())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fake::FakeDocument;

    #[test]
    fn timestamped_names_carry_prefix_and_extension() {
        let store = ArtifactStore::new("shots");
        let path = store.timestamped("test_01_admin_page");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(path.starts_with("shots"));
        assert!(name.starts_with("test_01_admin_page_"));
        assert!(name.ends_with(".png"));
        // prefix + '_' + 8 date digits + '_' + 6 time digits + ".png"
        assert_eq!(name.len(), "test_01_admin_page_".len() + 15 + 4);

        let short = store.timestamped_short("stability_initial");
        let short_name = short.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(short_name.len(), "stability_initial_".len() + 6 + 4);
    }

    #[tokio::test]
    async fn capture_writes_png_bytes() {
        let store = scratch_store();
        let doc = FakeDocument::new();
        let path = store.named("probe.png");

        let written = store.capture(&doc, &path).await.unwrap();
        let bytes = std::fs::read(&written).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));

        std::fs::remove_dir_all(store.dir()).ok();
    }

    #[tokio::test]
    async fn try_capture_swallows_failures() {
        let store = scratch_store();
        let doc = FakeDocument {
            fail_screenshots: true,
            ..FakeDocument::new()
        };

        assert!(store.try_capture(&doc, &store.named("x.png")).await.is_none());
        assert!(!store.named("x.png").exists());
    }
}
