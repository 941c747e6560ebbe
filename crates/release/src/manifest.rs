//! Cargo manifest parsing.
//!
//! Only the handful of fields the planner looks at are modelled; every other
//! key in the manifest is ignored. The parsed [`Manifest`] is a read-only
//! snapshot and is never written back. Rewriting manifests is the job of the
//! [`updaters`](crate::updaters), which operate on the raw text to preserve
//! formatting.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Structured view of a `Cargo.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// The `[workspace]` table, if present.
    pub workspace: Option<WorkspaceSection>,
    /// The `[package]` table, if present.
    pub package: Option<PackageSection>,
}

/// The `[workspace]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspaceSection {
    /// Declared member paths, in declaration order.
    pub members: Option<Vec<String>>,
    /// The `[workspace.package]` table.
    pub package: Option<WorkspacePackage>,
}

/// The `[workspace.package]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkspacePackage {
    /// Shared version inherited by members.
    pub version: Option<String>,
}

/// The `[package]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageSection {
    /// Package name.
    pub name: Option<String>,
    /// Package version, either literal or inherited from the workspace.
    pub version: Option<VersionField>,
}

/// A `package.version` value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionField {
    /// `version = "1.2.3"`
    Literal(String),
    /// `version.workspace = true`
    Inherited {
        /// Whether the version is taken from `[workspace.package]`.
        workspace: bool,
    },
}

impl Manifest {
    /// The `[workspace.package].version` string, if declared.
    #[must_use]
    pub fn workspace_version(&self) -> Option<&str> {
        self.workspace
            .as_ref()
            .and_then(|w| w.package.as_ref())
            .and_then(|p| p.version.as_deref())
    }

    /// The `[workspace].members` list, if declared.
    #[must_use]
    pub fn members(&self) -> Option<&[String]> {
        self.workspace
            .as_ref()
            .and_then(|w| w.members.as_deref())
    }

    /// The `[package].name`, if declared.
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().and_then(|p| p.name.as_deref())
    }

    /// The literal `[package].version`, if declared as a string.
    #[must_use]
    pub fn package_version(&self) -> Option<&str> {
        match self.package.as_ref()?.version.as_ref()? {
            VersionField::Literal(version) => Some(version),
            VersionField::Inherited { .. } => None,
        }
    }

    /// Whether the package declares `version.workspace = true`.
    #[must_use]
    pub fn inherits_workspace_version(&self) -> bool {
        matches!(
            self.package.as_ref().and_then(|p| p.version.as_ref()),
            Some(VersionField::Inherited { workspace: true })
        )
    }
}

/// Parse manifest text into a [`Manifest`].
///
/// # Errors
///
/// Returns [`Error::ManifestParse`] if the content is not valid TOML or a
/// modelled field has an unexpected type.
pub fn parse(content: &str) -> Result<Manifest> {
    toml::from_str(content).map_err(|e| Error::manifest_parse(e.message(), None))
}

/// Parse manifest text, attributing any error to `path`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_at(content: &str, path: &str) -> Result<Manifest> {
    toml::from_str(content).map_err(|e| {
        let message = e.to_string();
        Error::manifest_parse(message.trim_end(), Some(path.to_string()))
    })
}
