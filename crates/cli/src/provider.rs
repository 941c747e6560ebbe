//! Filesystem content provider.

use async_trait::async_trait;
use lockstep_release::provider::normalize_path;
use lockstep_release::{ContentProvider, Error, FileContent, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Reads repository paths from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsContentProvider {
    root: PathBuf,
}

impl FsContentProvider {
    /// Create a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory repository paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentProvider for FsContentProvider {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn get_content(&self, path: &str) -> Result<Option<FileContent>> {
        let path = normalize_path(path);
        let full_path = self.root.join(&path);
        trace!(path = %full_path.display(), "Reading file");

        match tokio::fs::read_to_string(&full_path).await {
            Ok(raw) => Ok(Some(FileContent::new(path, raw))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::content_access_with_source(path, e)),
        }
    }
}
