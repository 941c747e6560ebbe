//! Content lookup abstraction.
//!
//! The planner never touches the filesystem or network itself. It asks a
//! [`ContentProvider`] for the text of repository paths at some fixed
//! reference (a branch, a commit, a working tree) and treats the answer as
//! read-only.
//!
//! Providers must distinguish two failure shapes:
//!
//! - `Ok(None)`: the path does not exist at this reference. For workspace
//!   members this is recoverable; the member is skipped with a warning.
//! - `Err(..)`: the path could not be read. This is always fatal.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Raw file content returned by a [`ContentProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Repository path the content was read from.
    pub path: String,
    /// The file's text.
    pub raw: String,
}

impl FileContent {
    /// Creates a new content record.
    #[must_use]
    pub fn new(path: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw: raw.into(),
        }
    }
}

/// Read-only lookup of file content at a fixed repository reference.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the content at `path` (a `/`-separated repository path).
    ///
    /// Returns `Ok(None)` when the path does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentAccess`] when the path exists (or may exist)
    /// but could not be read.
    async fn get_content(&self, path: &str) -> Result<Option<FileContent>>;
}

#[async_trait]
impl<T: ContentProvider + ?Sized> ContentProvider for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn get_content(&self, path: &str) -> Result<Option<FileContent>> {
        (**self).get_content(path).await
    }
}

/// A [`ContentProvider`] backed by an in-memory map.
///
/// Useful for embedding (content already fetched in bulk) and for tests. Read
/// failures can be injected per path with [`with_failure`](Self::with_failure).
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentProvider {
    files: HashMap<String, String>,
    failures: HashMap<String, String>,
}

impl InMemoryContentProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Makes every read of `path` fail with `message`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(normalize_path(&path.into()), message.into());
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(normalize_path(&path.into()), content.into());
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl ContentProvider for InMemoryContentProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_content(&self, path: &str) -> Result<Option<FileContent>> {
        let path = normalize_path(path);
        if let Some(message) = self.failures.get(&path) {
            return Err(Error::content_access(path, message.clone()));
        }
        Ok(self
            .files
            .get(&path)
            .map(|raw| FileContent::new(path.clone(), raw.clone())))
    }
}

/// Normalizes a repository path: strips `./` segments, empty segments and
/// trailing slashes. The repository root normalizes to the empty string.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins a repository directory and a relative path.
///
/// `join_path(".", "Cargo.toml")` is `"Cargo.toml"`;
/// `join_path("crates/a/", "Cargo.toml")` is `"crates/a/Cargo.toml"`.
#[must_use]
pub fn join_path(dir: &str, file: &str) -> String {
    let dir = normalize_path(dir);
    let file = normalize_path(file);
    match (dir.is_empty(), file.is_empty()) {
        (true, _) => file,
        (false, true) => dir,
        (false, false) => format!("{dir}/{file}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("crates/a"), "crates/a");
        assert_eq!(normalize_path("./crates/a/"), "crates/a");
        assert_eq!(normalize_path("crates//a/./Cargo.toml"), "crates/a/Cargo.toml");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(".", "Cargo.toml"), "Cargo.toml");
        assert_eq!(join_path("", "Cargo.lock"), "Cargo.lock");
        assert_eq!(join_path("crates/a/", "Cargo.toml"), "crates/a/Cargo.toml");
        assert_eq!(join_path("packages/rust", "crates/b"), "packages/rust/crates/b");
        assert_eq!(join_path("crates/a", ""), "crates/a");
    }

    #[tokio::test]
    async fn test_in_memory_found() {
        let provider = InMemoryContentProvider::new().with_file("crates/a/Cargo.toml", "[package]");

        let content = provider.get_content("./crates/a/Cargo.toml").await.unwrap();
        assert_eq!(
            content,
            Some(FileContent::new("crates/a/Cargo.toml", "[package]"))
        );
    }

    #[tokio::test]
    async fn test_in_memory_not_found() {
        let provider = InMemoryContentProvider::new();
        assert!(provider.is_empty());
        assert!(provider.get_content("Cargo.toml").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_injected_failure() {
        let provider = InMemoryContentProvider::new()
            .with_file("Cargo.toml", "[workspace]")
            .with_failure("Cargo.toml", "rate limited");

        let err = provider.get_content("Cargo.toml").await.unwrap_err();
        assert!(matches!(err, Error::ContentAccess { .. }));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_arc_provider_delegates() {
        let provider = Arc::new(InMemoryContentProvider::new().with_file("a", "b"));
        assert_eq!(provider.name(), "memory");
        assert_eq!(provider.get_content("a").await.unwrap().unwrap().raw, "b");
        assert_eq!(provider.len(), 1);
    }
}
