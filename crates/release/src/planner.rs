//! Release update planning.
//!
//! A [`ReleaseStrategy`] turns a chosen release version into an ordered
//! [`UpdatePlan`]: a list of files to rewrite and the updater to rewrite each
//! one with. Planning is all-or-nothing. Any fatal error discards everything
//! staged so far, so a caller never sees a partial plan.
//!
//! For a Cargo workspace the plan always has the shape
//! `[changelog?] → root manifest → lockfile`.

use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::manifest::{self, Manifest};
use crate::provider::ContentProvider;
use crate::updaters::UpdaterConfig;
use crate::version::Version;
use crate::workspace::{MemberWarning, VersionMap, WorkspaceResolver};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, info, instrument};

/// A single file rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstruction {
    /// Repository path of the file.
    pub path: String,
    /// Whether the file may be created when it does not exist.
    pub create_if_missing: bool,
    /// The updater to run against the file.
    pub updater: UpdaterConfig,
}

/// Ordered list of rewrites making up a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
    /// Version being released.
    pub version: Version,
    /// Rewrites, in the order they must be applied.
    pub updates: Vec<UpdateInstruction>,
    /// Members skipped or overridden while resolving the workspace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MemberWarning>,
}

impl UpdatePlan {
    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether the plan has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Iterate over instructions in application order.
    pub fn iter(&self) -> impl Iterator<Item = &UpdateInstruction> {
        self.updates.iter()
    }

    /// The version map carried by the lockfile instruction, if any.
    #[must_use]
    pub fn version_map(&self) -> Option<&VersionMap> {
        self.updates.iter().find_map(|update| match &update.updater {
            UpdaterConfig::Lockfile { versions } => Some(versions),
            _ => None,
        })
    }

    /// Serialize the plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the plan for a terminal.
    #[must_use]
    pub fn to_human_readable(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Release plan for {} ({} update(s)):\n",
            self.version,
            self.updates.len()
        );

        for (i, update) in self.updates.iter().enumerate() {
            let _ = write!(output, "  {}. {} [{}]", i + 1, update.path, update.updater.kind());
            match &update.updater {
                UpdaterConfig::Changelog { .. } => {}
                UpdaterConfig::WorkspaceManifest { version } => {
                    let _ = write!(output, " workspace.package.version = {version}");
                }
                UpdaterConfig::Lockfile { versions } => {
                    let names: Vec<&str> = versions.names().collect();
                    let _ = write!(
                        output,
                        " pins {} package(s): {}",
                        names.len(),
                        names.join(", ")
                    );
                }
            }
            if update.create_if_missing {
                output.push_str(" (created if missing)");
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("\nWarnings:\n\n");
            for warning in &self.warnings {
                let _ = writeln!(output, "  • {warning}");
            }
        }

        output
    }
}

/// Produces an ordered update plan for a new release version.
#[async_trait]
pub trait ReleaseStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Build the plan releasing every package at `new_version`.
    ///
    /// When `skip_changelog` is false the plan starts with a changelog
    /// instruction carrying `changelog_entry`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error met while validating and resolving the
    /// workspace. No plan is produced in that case.
    async fn build_updates(
        &self,
        new_version: &Version,
        changelog_entry: &str,
        skip_changelog: bool,
    ) -> Result<UpdatePlan>;
}

/// Release strategy for a Cargo workspace released in lockstep.
///
/// Every member shares the root's `[workspace.package].version`; the plan
/// bumps that version and pins every workspace package in the lockfile.
pub struct CargoWorkspaceStrategy<P> {
    provider: P,
    config: PlannerConfig,
}

impl<P: ContentProvider> CargoWorkspaceStrategy<P> {
    /// Create a strategy reading through `provider`.
    #[must_use]
    pub const fn new(provider: P, config: PlannerConfig) -> Self {
        Self { provider, config }
    }

    /// The planner configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

#[async_trait]
impl<P: ContentProvider> ReleaseStrategy for CargoWorkspaceStrategy<P> {
    fn name(&self) -> &'static str {
        "cargo-workspace"
    }

    #[instrument(
        name = "build_updates",
        skip(self, changelog_entry),
        fields(strategy = "cargo-workspace", version = %new_version)
    )]
    async fn build_updates(
        &self,
        new_version: &Version,
        changelog_entry: &str,
        skip_changelog: bool,
    ) -> Result<UpdatePlan> {
        let mut updates = Vec::with_capacity(3);

        if skip_changelog {
            debug!("Skipping changelog update");
        } else {
            updates.push(stage_changelog(
                self.config.changelog_path(),
                new_version,
                changelog_entry,
            ));
        }

        let manifest_path = self.config.root_manifest_path();
        let root = fetch_manifest(&self.provider, &manifest_path).await?;

        let resolution = WorkspaceResolver::new(&self.provider)
            .with_root_dir(&self.config.root_path)
            .with_manifest_file(&self.config.manifest_file)
            .with_max_concurrent_fetches(self.config.max_concurrent_fetches)
            .compute_version_map(&root, new_version)
            .await?;

        updates.push(UpdateInstruction {
            path: manifest_path,
            create_if_missing: false,
            updater: UpdaterConfig::WorkspaceManifest {
                version: new_version.clone(),
            },
        });
        updates.push(UpdateInstruction {
            path: self.config.lockfile_path(),
            create_if_missing: false,
            updater: UpdaterConfig::Lockfile {
                versions: resolution.versions,
            },
        });

        info!(
            updates = updates.len(),
            warnings = resolution.warnings.len(),
            "Assembled release plan"
        );

        Ok(UpdatePlan {
            version: new_version.clone(),
            updates,
            warnings: resolution.warnings,
        })
    }
}

/// Changelog instruction for `version`, creating the file if needed.
#[must_use]
pub fn stage_changelog(path: impl Into<String>, version: &Version, entry: &str) -> UpdateInstruction {
    UpdateInstruction {
        path: path.into(),
        create_if_missing: true,
        updater: UpdaterConfig::Changelog {
            version: version.clone(),
            entry: entry.to_string(),
        },
    }
}

/// Fetch and parse the manifest at `path`.
///
/// # Errors
///
/// - [`Error::Config`] if the manifest does not exist
/// - [`Error::ContentAccess`] if it cannot be read
/// - [`Error::ManifestParse`] if it is malformed
pub async fn fetch_manifest<P: ContentProvider + ?Sized>(
    provider: &P,
    path: &str,
) -> Result<Manifest> {
    let Some(content) = provider.get_content(path).await? else {
        return Err(Error::config(
            format!("root manifest not found at {path}"),
            "Point the planner at the workspace root (rootPath in lockstep.toml or --root)",
        ));
    };
    manifest::parse_at(&content.raw, path)
}
