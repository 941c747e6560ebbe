//! File updaters referenced by update instructions.
//!
//! An [`UpdaterConfig`] is the serializable description the planner puts in
//! each instruction. Building it yields an [`Updater`] that turns the current
//! file text (or `None` when the file does not exist) into the new text.
//! Updaters are pure: they never read or write files themselves.

mod changelog;
mod lockfile;
mod workspace_manifest;

pub use changelog::{ChangelogUpdater, DEFAULT_CHANGELOG_HEADER};
pub use lockfile::LockfileUpdater;
pub use workspace_manifest::WorkspaceManifestUpdater;

use crate::error::Result;
use crate::version::Version;
use crate::workspace::VersionMap;
use serde::{Deserialize, Serialize};
use toml_edit::{Item, Value};

/// Transforms the content of a single file.
pub trait Updater: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Produce the new content from the existing content.
    ///
    /// `existing` is `None` when the target file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Updater`](crate::Error::Updater) when the file is
    /// missing or lacks the field being rewritten, and a TOML error when
    /// the existing content cannot be parsed.
    fn update_content(&self, existing: Option<&str>) -> Result<String>;
}

/// Which updater to run for an instruction, and with which parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UpdaterConfig {
    /// Insert a release entry into a changelog.
    Changelog {
        /// Version being released.
        version: Version,
        /// Markdown entry text.
        entry: String,
    },
    /// Rewrite `[workspace.package].version` in the root manifest.
    WorkspaceManifest {
        /// Version being released.
        version: Version,
    },
    /// Rewrite the version of every locked package named in the map.
    Lockfile {
        /// Package name → release version.
        versions: VersionMap,
    },
}

impl UpdaterConfig {
    /// Short name of the updater this config builds.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Changelog { .. } => changelog::NAME,
            Self::WorkspaceManifest { .. } => workspace_manifest::NAME,
            Self::Lockfile { .. } => lockfile::NAME,
        }
    }

    /// Build the updater described by this config.
    #[must_use]
    pub fn build(&self) -> Box<dyn Updater> {
        match self {
            Self::Changelog { version, entry } => {
                Box::new(ChangelogUpdater::new(version.clone(), entry.clone()))
            }
            Self::WorkspaceManifest { version } => {
                Box::new(WorkspaceManifestUpdater::new(version.clone()))
            }
            Self::Lockfile { versions } => Box::new(LockfileUpdater::new(versions.clone())),
        }
    }
}

/// Replace a string value in place, keeping its surrounding whitespace and
/// comments. Returns `false` if `item` is not a string value.
pub(crate) fn replace_string_value(item: &mut Item, new_value: &str) -> bool {
    let Some(value) = item.as_value_mut() else {
        return false;
    };
    if !value.is_str() {
        return false;
    }
    let decor = value.decor().clone();
    *value = Value::from(new_value);
    *value.decor_mut() = decor;
    true
}
