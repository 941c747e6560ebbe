//! Planner configuration.
//!
//! Settings live in the `[planner]` table of `lockstep.toml`. Every field is
//! optional; omitted fields take the defaults of a conventional Cargo
//! workspace at the repository root.

use crate::error::Result;
use crate::provider::join_path;
use crate::workspace::{DEFAULT_MANIFEST_FILE, DEFAULT_MAX_CONCURRENT_FETCHES};
use serde::{Deserialize, Serialize};

/// Name of the configuration file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "lockstep.toml";

/// Where the workspace files live and how members are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// Workspace directory, relative to the repository root.
    pub root_path: String,
    /// Manifest file name, used for the root and for every member.
    pub manifest_file: String,
    /// Lockfile path, relative to `root_path`.
    pub lockfile: String,
    /// Changelog path, relative to `root_path`.
    pub changelog_path: String,
    /// Upper bound on member manifests fetched at once.
    pub max_concurrent_fetches: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            root_path: ".".to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            lockfile: "Cargo.lock".to_string(),
            changelog_path: "CHANGELOG.md".to_string(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    planner: PlannerConfig,
}

impl PlannerConfig {
    /// Parse the contents of a `lockstep.toml`.
    ///
    /// A document without a `[planner]` table yields the defaults. Unknown
    /// tables are ignored so the file can carry settings for other tools.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`](crate::Error::Toml) if the document is not
    /// valid TOML or a field has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.planner)
    }

    /// Set the workspace directory.
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    /// Repository path of the root manifest.
    #[must_use]
    pub fn root_manifest_path(&self) -> String {
        join_path(&self.root_path, &self.manifest_file)
    }

    /// Repository path of the lockfile.
    #[must_use]
    pub fn lockfile_path(&self) -> String {
        join_path(&self.root_path, &self.lockfile)
    }

    /// Repository path of the changelog.
    #[must_use]
    pub fn changelog_path(&self) -> String {
        join_path(&self.root_path, &self.changelog_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.root_manifest_path(), "Cargo.toml");
        assert_eq!(config.lockfile_path(), "Cargo.lock");
        assert_eq!(config.changelog_path(), "CHANGELOG.md");
        assert_eq!(config.max_concurrent_fetches, 8);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = PlannerConfig::from_toml_str(
            r#"
[planner]
rootPath = "rust"
changelogPath = "docs/CHANGES.md"
maxConcurrentFetches = 2
"#,
        )
        .unwrap();

        assert_eq!(config.root_manifest_path(), "rust/Cargo.toml");
        assert_eq!(config.lockfile_path(), "rust/Cargo.lock");
        assert_eq!(config.changelog_path(), "rust/docs/CHANGES.md");
        assert_eq!(config.max_concurrent_fetches, 2);
    }

    #[test]
    fn test_from_toml_without_planner_table() {
        let config = PlannerConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, PlannerConfig::default());

        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let err = PlannerConfig::from_toml_str("[planner]\nmaxConcurrentFetches = \"many\"\n")
            .unwrap_err();
        assert!(matches!(err, crate::Error::Toml(_)));
    }

    #[test]
    fn test_with_root_path() {
        let config = PlannerConfig::default().with_root_path("./nested/ws/");
        assert_eq!(config.root_manifest_path(), "nested/ws/Cargo.toml");
    }
}
