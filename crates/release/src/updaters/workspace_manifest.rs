//! Root manifest version rewriting.

use super::{Updater, replace_string_value};
use crate::error::{Error, Result};
use crate::version::Version;
use toml_edit::{DocumentMut, Item, value};
use tracing::debug;

pub(super) const NAME: &str = "workspace-manifest";

/// Sets `[workspace.package].version`, leaving every other byte alone.
#[derive(Debug, Clone)]
pub struct WorkspaceManifestUpdater {
    version: Version,
}

impl WorkspaceManifestUpdater {
    /// Create an updater that sets the workspace version to `version`.
    #[must_use]
    pub const fn new(version: Version) -> Self {
        Self { version }
    }
}

impl Updater for WorkspaceManifestUpdater {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update_content(&self, existing: Option<&str>) -> Result<String> {
        let Some(existing) = existing else {
            return Err(Error::updater(NAME, "root manifest does not exist"));
        };

        let mut doc: DocumentMut = existing.parse()?;
        let version = self.version.to_string();

        let package = doc
            .get_mut("workspace")
            .and_then(|workspace| workspace.get_mut("package"))
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| Error::updater(NAME, "no [workspace.package] table"))?;

        match package.get_mut("version") {
            Some(item) => {
                if !replace_string_value(item, &version) {
                    return Err(Error::updater(
                        NAME,
                        "workspace.package.version is not a string",
                    ));
                }
            }
            None => {
                package.insert("version", value(version.as_str()));
            }
        }

        debug!(version = %version, "Set workspace.package.version");
        Ok(doc.to_string())
    }
}
