//! Changelog entry insertion.

use super::Updater;
use crate::error::{Error, Result};
use crate::version::Version;
use tracing::debug;

pub(super) const NAME: &str = "changelog";

/// Title block written when the changelog does not exist yet.
pub const DEFAULT_CHANGELOG_HEADER: &str =
    "# Changelog\n\nAll notable changes to this project will be documented in this file.\n";

/// Inserts a release entry above the most recent one.
///
/// The entry goes right before the first `## ` heading, so the file title and
/// any introduction stay on top. An entry that does not start with a heading
/// gets a `## [<version>]` heading prepended.
#[derive(Debug, Clone)]
pub struct ChangelogUpdater {
    version: Version,
    entry: String,
}

impl ChangelogUpdater {
    /// Create an updater for `version` with the given entry text.
    #[must_use]
    pub fn new(version: Version, entry: impl Into<String>) -> Self {
        Self {
            version,
            entry: entry.into(),
        }
    }

    fn rendered_entry(&self) -> Result<String> {
        let entry = self.entry.trim();
        if entry.is_empty() {
            return Err(Error::updater(
                NAME,
                format!("entry for {} is empty", self.version),
            ));
        }
        if entry.starts_with('#') {
            Ok(entry.to_string())
        } else {
            Ok(format!("## [{}]\n\n{entry}", self.version))
        }
    }
}

impl Updater for ChangelogUpdater {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update_content(&self, existing: Option<&str>) -> Result<String> {
        let entry = self.rendered_entry()?;
        let existing = existing.unwrap_or(DEFAULT_CHANGELOG_HEADER);

        // Keep the file's own line endings
        let eol = if existing.contains("\r\n") { "\r\n" } else { "\n" };
        let entry = if eol == "\n" {
            entry
        } else {
            entry.replace("\r\n", "\n").replace('\n', eol)
        };

        let content = if existing.starts_with("## ") {
            format!("{entry}{eol}{eol}{existing}")
        } else if let Some(idx) = existing.find("\n## ") {
            // idx points at the newline ending the line before the heading
            let (head, tail) = existing.split_at(idx + 1);
            let head = head.trim_end();
            format!("{head}{eol}{eol}{entry}{eol}{eol}{tail}")
        } else {
            let head = existing.trim_end();
            if head.is_empty() {
                format!("{entry}{eol}")
            } else {
                format!("{head}{eol}{eol}{entry}{eol}")
            }
        };

        debug!(version = %self.version, "Inserted changelog entry");
        Ok(content)
    }
}
