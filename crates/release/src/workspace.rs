//! Workspace member resolution and version map construction.
//!
//! Given a validated root manifest, every declared member's manifest is
//! fetched through the [`ContentProvider`] and its package name recorded in a
//! [`VersionMap`] pointing at the release version. Members that are declared
//! but absent, or that have no package name, are skipped with a
//! [`MemberWarning`]; read and parse failures abort the whole resolution.
//!
//! Fetches run concurrently, but results are always folded in declaration
//! order so that name collisions resolve the same way on every run.

use crate::error::{Error, Result};
use crate::manifest::{self, Manifest};
use crate::provider::{ContentProvider, FileContent, join_path};
use crate::version::Version;
use futures::{StreamExt, TryStreamExt, stream};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Default manifest file name inside each member directory.
pub const DEFAULT_MANIFEST_FILE: &str = "Cargo.toml";

/// Default number of member manifests fetched at once.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Member label used for the root package in warnings.
const ROOT_MEMBER: &str = ".";

/// Package name → release version, in insertion order.
///
/// The root package is always inserted first, followed by members in their
/// declared order. Re-inserting an existing name replaces its version but
/// keeps its original position. Equality is order-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionMap(IndexMap<String, Version>);

impl VersionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the version for `name`, returning the previous version if any.
    pub fn insert(&mut self, name: impl Into<String>, version: Version) -> Option<Version> {
        self.0.insert(name.into(), version)
    }

    /// Looks up the version for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Version> {
        self.0.get(name)
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Version)> {
        self.0.iter().map(|(name, version)| (name.as_str(), version))
    }

    /// Package names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl PartialEq for VersionMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for VersionMap {}

impl<K: Into<String>> FromIterator<(K, Version)> for VersionMap {
    fn from_iter<I: IntoIterator<Item = (K, Version)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, version) in iter {
            map.insert(name, version);
        }
        map
    }
}

/// A non-fatal problem found while resolving a workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberWarning {
    /// The member is declared but its manifest does not exist.
    ManifestMissing {
        /// Declared member path
        member: String,
        /// Manifest path that was requested
        path: String,
    },
    /// The member is a glob pattern, which is not expanded.
    GlobNotExpanded {
        /// Declared member pattern
        member: String,
    },
    /// The member manifest has no `package.name`.
    MissingPackageName {
        /// Declared member path
        member: String,
        /// Manifest path that was read
        path: String,
    },
    /// The member's package name was already taken by an earlier entry.
    ///
    /// The later member still wins; this only records the collision.
    DuplicatePackageName {
        /// Declared member path
        member: String,
        /// The colliding package name
        name: String,
        /// Member that previously held the name (`.` for the root package)
        previous_member: String,
    },
}

impl MemberWarning {
    /// The declared member path this warning is about.
    #[must_use]
    pub fn member(&self) -> &str {
        match self {
            Self::ManifestMissing { member, .. }
            | Self::GlobNotExpanded { member }
            | Self::MissingPackageName { member, .. }
            | Self::DuplicatePackageName { member, .. } => member,
        }
    }
}

impl fmt::Display for MemberWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestMissing { member, path } => {
                write!(f, "member {member} declared but manifest missing ({path})")
            }
            Self::GlobNotExpanded { member } => {
                write!(f, "member {member} is a glob pattern; list members explicitly")
            }
            Self::MissingPackageName { member, path } => {
                write!(f, "member {member} has no package.name ({path})")
            }
            Self::DuplicatePackageName {
                member,
                name,
                previous_member,
            } => write!(
                f,
                "member {member} reuses package name {name} from {previous_member}; later entry wins"
            ),
        }
    }
}

/// Resolution outcome of a single member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberOutcome {
    /// The manifest was found and names a package.
    Resolved {
        /// Package name
        name: String,
        /// Parsed member manifest
        manifest: Manifest,
    },
    /// The member was skipped.
    Skipped(MemberWarning),
}

/// A declared member together with its resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceMember {
    /// Path as declared in `workspace.members`.
    pub path: String,
    /// Repository path of the member manifest.
    pub manifest_path: String,
    /// What happened when resolving it.
    pub outcome: MemberOutcome,
}

impl WorkspaceMember {
    /// The resolved package name, if any.
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        match &self.outcome {
            MemberOutcome::Resolved { name, .. } => Some(name),
            MemberOutcome::Skipped(_) => None,
        }
    }
}

/// The validated facts a lockstep release needs from the root manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootWorkspace<'a> {
    /// `package.name` of the root manifest.
    pub package_name: &'a str,
    /// `workspace.package.version` of the root manifest.
    pub workspace_version: &'a str,
    /// `workspace.members`, never empty.
    pub members: &'a [String],
}

/// Checks that the root manifest has everything a lockstep release needs.
///
/// Checks run in a fixed order, so the first missing field is reported.
///
/// # Errors
///
/// Returns [`Error::Config`] naming the first missing piece.
pub fn validate_root(manifest: &Manifest) -> Result<RootWorkspace<'_>> {
    let Some(workspace) = manifest.workspace.as_ref() else {
        return Err(Error::config(
            "requires a workspace in root manifest",
            "Add a [workspace] table to the root Cargo.toml",
        ));
    };

    let workspace_version = match workspace.package.as_ref() {
        Some(package) => match package.version.as_deref() {
            Some(version) => version,
            None => return Err(missing_workspace_version()),
        },
        None => return Err(missing_workspace_version()),
    };

    let package_name = match manifest.package.as_ref() {
        Some(package) => match package.name.as_deref() {
            Some(name) => name,
            None => return Err(missing_package_name()),
        },
        None => return Err(missing_package_name()),
    };

    let members = match workspace.members.as_deref() {
        Some(members) if !members.is_empty() => members,
        Some(_) | None => {
            return Err(Error::config(
                "requires workspace members in root manifest",
                "List at least one member under [workspace].members",
            ));
        }
    };

    Ok(RootWorkspace {
        package_name,
        workspace_version,
        members,
    })
}

fn missing_workspace_version() -> Error {
    Error::config(
        "requires workspace.package.version in root manifest",
        "Set version under [workspace.package] in the root Cargo.toml",
    )
}

fn missing_package_name() -> Error {
    Error::config(
        "requires package.name in root manifest",
        "Set name under [package] in the root Cargo.toml",
    )
}

/// Result of resolving a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Name of the root package.
    pub root_name: String,
    /// Package name → release version.
    pub versions: VersionMap,
    /// Every declared member, in declaration order.
    pub members: Vec<WorkspaceMember>,
    /// Warnings recorded during resolution, in the order they occurred.
    pub warnings: Vec<MemberWarning>,
}

/// Resolves workspace members through a [`ContentProvider`].
pub struct WorkspaceResolver<'a, P: ContentProvider + ?Sized> {
    provider: &'a P,
    root_dir: String,
    manifest_file: String,
    max_concurrent_fetches: usize,
}

impl<'a, P: ContentProvider + ?Sized> WorkspaceResolver<'a, P> {
    /// Creates a resolver for a workspace at the repository root.
    #[must_use]
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            root_dir: String::new(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Sets the directory the workspace lives in; member paths are relative to it.
    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Sets the manifest file name looked up in each member directory.
    #[must_use]
    pub fn with_manifest_file(mut self, manifest_file: impl Into<String>) -> Self {
        self.manifest_file = manifest_file.into();
        self
    }

    /// Sets how many member manifests may be fetched at once (minimum 1).
    #[must_use]
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Repository path of the manifest for a declared member.
    #[must_use]
    pub fn member_manifest_path(&self, member: &str) -> String {
        join_path(&join_path(&self.root_dir, member), &self.manifest_file)
    }

    /// Validates `root` and builds the version map for `new_version`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the root manifest fails validation
    /// - [`Error::ContentAccess`] if any member manifest cannot be read
    /// - [`Error::ManifestParse`] if any member manifest is malformed
    pub async fn compute_version_map(
        &self,
        root: &Manifest,
        new_version: &Version,
    ) -> Result<Resolution> {
        let root_workspace = validate_root(root)?;

        let mut versions = VersionMap::new();
        versions.insert(root_workspace.package_name, new_version.clone());
        let mut owners: HashMap<String, String> = HashMap::from([(
            root_workspace.package_name.to_string(),
            ROOT_MEMBER.to_string(),
        )]);

        let fetched = self.fetch_members(root_workspace.members).await?;

        let mut members = Vec::with_capacity(fetched.len());
        let mut warnings = Vec::new();

        for (member, manifest_path, content) in fetched {
            let outcome = match content {
                None if is_glob_pattern(&member) => {
                    MemberOutcome::Skipped(MemberWarning::GlobNotExpanded {
                        member: member.clone(),
                    })
                }
                None => MemberOutcome::Skipped(MemberWarning::ManifestMissing {
                    member: member.clone(),
                    path: manifest_path.clone(),
                }),
                Some(content) => {
                    let parsed = manifest::parse_at(&content.raw, &manifest_path)?;
                    match parsed.package_name().map(str::to_string) {
                        None => MemberOutcome::Skipped(MemberWarning::MissingPackageName {
                            member: member.clone(),
                            path: manifest_path.clone(),
                        }),
                        Some(name) => {
                            if let Some(previous_member) = owners.insert(name.clone(), member.clone())
                            {
                                let warning = MemberWarning::DuplicatePackageName {
                                    member: member.clone(),
                                    name: name.clone(),
                                    previous_member,
                                };
                                warn!(%warning, "Duplicate package name in workspace");
                                warnings.push(warning);
                            }
                            versions.insert(name.clone(), new_version.clone());
                            debug!(member = %member, package = %name, "Resolved workspace member");
                            MemberOutcome::Resolved {
                                name,
                                manifest: parsed,
                            }
                        }
                    }
                }
            };

            if let MemberOutcome::Skipped(warning) = &outcome {
                warn!(%warning, "Skipping workspace member");
                warnings.push(warning.clone());
            }

            members.push(WorkspaceMember {
                path: member,
                manifest_path,
                outcome,
            });
        }

        info!(
            root = root_workspace.package_name,
            version = %new_version,
            packages = versions.len(),
            skipped = members.iter().filter(|m| m.package_name().is_none()).count(),
            "Built workspace version map"
        );

        Ok(Resolution {
            root_name: root_workspace.package_name.to_string(),
            versions,
            members,
            warnings,
        })
    }

    /// Fetches every member manifest, returning results in declaration order.
    ///
    /// Glob members are not fetched and come back with no content.
    async fn fetch_members(
        &self,
        members: &[String],
    ) -> Result<Vec<(String, String, Option<FileContent>)>> {
        stream::iter(members.iter().cloned().map(|member| self.fetch_member(member)))
            .buffered(self.max_concurrent_fetches)
            .try_collect()
            .await
    }

    async fn fetch_member(&self, member: String) -> Result<(String, String, Option<FileContent>)> {
        let manifest_path = self.member_manifest_path(&member);
        if is_glob_pattern(&member) {
            return Ok((member, manifest_path, None));
        }
        debug!(
            member = %member,
            path = %manifest_path,
            provider = self.provider.name(),
            "Fetching member manifest"
        );
        let content = self.provider.get_content(&manifest_path).await?;
        Ok((member, manifest_path, content))
    }
}

/// Whether a declared member uses glob syntax.
fn is_glob_pattern(member: &str) -> bool {
    member.contains(['*', '?', '['])
}

/// Validates `root` and builds the version map, fetching member manifests
/// from the repository root with default settings.
///
/// # Errors
///
/// See [`WorkspaceResolver::compute_version_map`].
pub async fn compute_version_map<P: ContentProvider + ?Sized>(
    root: &Manifest,
    new_version: &Version,
    provider: &P,
) -> Result<Resolution> {
    WorkspaceResolver::new(provider)
        .compute_version_map(root, new_version)
        .await
}
