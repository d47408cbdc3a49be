//! File-simulated tag medium.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::debug;

use crate::medium::{ScanOptions, TagInfo, TagMedium};
use seedvault_common::{Error, Result};

/// Tag medium that simulates a single physical tag as a local file.
///
/// Reading the file is a tap delivering its text content as one record;
/// writing overwrites the content; erasing truncates it. Lets the full
/// import/export protocol run without radio hardware.
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    /// Create a file medium over the given tag file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the simulated tag.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn medium_err(&self, action: &str, e: std::io::Error) -> Error {
        Error::Medium(format!(
            "Cannot {} tag file {}: {}",
            action,
            self.path.display(),
            e
        ))
    }
}

#[async_trait]
impl TagMedium for FileMedium {
    fn name(&self) -> &str {
        "file"
    }

    async fn available(&self) -> Result<bool> {
        Ok(true)
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(true)
    }

    async fn start_tag_listener(&self) -> Result<mpsc::Receiver<TagInfo>> {
        let (tx, rx) = mpsc::channel(1);
        if self.path.exists() {
            let id = self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "tag".to_string());
            let _ = tx.send(TagInfo { id }).await;
        }
        Ok(rx)
    }

    async fn stop_tag_listener(&self) -> Result<()> {
        Ok(())
    }

    async fn start_payload_listener(&self, options: ScanOptions) -> Result<mpsc::Receiver<String>> {
        if let Some(hint) = &options.scan_hint {
            debug!(hint = %hint, "Scanning simulated tag");
        }

        let (tx, rx) = mpsc::channel(1);

        // A missing or empty file is a blank tag: the tap delivers no records.
        if self.path.exists() {
            let content = fs::read_to_string(&self.path)
                .await
                .map_err(|e| self.medium_err("read", e))?;
            if !content.is_empty() {
                let _ = tx.send(content).await;
            }
        }

        Ok(rx)
    }

    async fn stop_payload_listener(&self) -> Result<()> {
        Ok(())
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        fs::write(&self.path, text.as_bytes())
            .await
            .map_err(|e| self.medium_err("write", e))?;
        debug!(path = %self.path.display(), bytes = text.len(), "Tag file written");
        Ok(())
    }

    async fn write_uri(&self, uri: &str) -> Result<()> {
        self.write_text(uri).await
    }

    async fn erase(&self) -> Result<()> {
        fs::write(&self.path, b"")
            .await
            .map_err(|e| self.medium_err("erase", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read_tap() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::new(dir.path().join("tag.txt"));

        medium.write_text("{\"name\":\"tagA\"}").await.unwrap();

        let mut rx = medium
            .start_payload_listener(ScanOptions::default())
            .await
            .unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("{\"name\":\"tagA\"}"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_missing_tag_delivers_nothing() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::new(dir.path().join("absent.txt"));

        let mut rx = medium
            .start_payload_listener(ScanOptions::default())
            .await
            .unwrap();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_erase_blanks_tag() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::new(dir.path().join("tag.txt"));

        medium.write_text("payload").await.unwrap();
        medium.erase().await.unwrap();

        let mut rx = medium
            .start_payload_listener(ScanOptions::default())
            .await
            .unwrap();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_tag_listener_reports_present_tag() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::new(dir.path().join("tag.txt"));

        medium.write_text("x").await.unwrap();

        let mut rx = medium.start_tag_listener().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().id, "tag.txt");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_medium_error() {
        let medium = FileMedium::new("/nonexistent-dir/deep/tag.txt");
        assert!(matches!(
            medium.write_text("x").await,
            Err(Error::Medium(_))
        ));
    }
}
