//! Lockstep release planning for Cargo workspaces.
//!
//! Given a release version chosen by the caller, this crate works out every
//! file rewrite needed to release all packages of a workspace together: the
//! root manifest's shared version, the lockfile entries of every workspace
//! package, and an optional changelog entry. It does no I/O of its own; all
//! content is read through a [`ContentProvider`], and the result is an
//! [`UpdatePlan`] describing what to change, not a set of changed files.
//!
//! # Architecture
//!
//! - [`manifest`] - Cargo manifest parsing
//! - [`workspace`] - Member resolution and the package → version map
//! - [`planner`] - The [`ReleaseStrategy`] trait and the Cargo workspace strategy
//! - [`updaters`] - Pure text transforms referenced by plan instructions
//! - [`preview`] - Applying a plan in memory
//! - [`provider`] - The content lookup abstraction
//! - [`config`] - Planner settings from `lockstep.toml`
//!
//! # Example
//!
//! ```rust,ignore
//! use lockstep_release::{
//!     CargoWorkspaceStrategy, InMemoryContentProvider, PlannerConfig, ReleaseStrategy, Version,
//! };
//!
//! let provider = InMemoryContentProvider::new()
//!     .with_file("Cargo.toml", root_manifest)
//!     .with_file("crates/a/Cargo.toml", member_manifest);
//!
//! let strategy = CargoWorkspaceStrategy::new(provider, PlannerConfig::default());
//! let plan = strategy
//!     .build_updates(&Version::new(1, 2, 3), "## [1.2.3]", false)
//!     .await?;
//!
//! println!("{}", plan.to_human_readable());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod planner;
pub mod preview;
pub mod provider;
pub mod updaters;
pub mod version;
pub mod workspace;

// Re-export main types
pub use config::PlannerConfig;
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use planner::{
    CargoWorkspaceStrategy, ReleaseStrategy, UpdateInstruction, UpdatePlan, fetch_manifest,
    stage_changelog,
};
pub use preview::{FilePreview, preview_plan};
pub use provider::{ContentProvider, FileContent, InMemoryContentProvider};
pub use updaters::{Updater, UpdaterConfig};
pub use version::Version;
pub use workspace::{
    MemberOutcome, MemberWarning, Resolution, VersionMap, WorkspaceMember, WorkspaceResolver,
    compute_version_map, validate_root,
};
