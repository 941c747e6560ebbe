//! Lockfile version rewriting.

use super::{Updater, replace_string_value};
use crate::error::{Error, Result};
use crate::workspace::VersionMap;
use toml_edit::{DocumentMut, Item};
use tracing::{debug, warn};

pub(super) const NAME: &str = "lockfile";

/// Sets the `version` of every `[[package]]` whose `name` is in the map.
///
/// Entries for other packages, including external dependencies, are left
/// untouched, as is everything outside the `[[package]]` array.
#[derive(Debug, Clone)]
pub struct LockfileUpdater {
    versions: VersionMap,
}

impl LockfileUpdater {
    /// Create an updater pinning the packages in `versions`.
    #[must_use]
    pub const fn new(versions: VersionMap) -> Self {
        Self { versions }
    }
}

impl Updater for LockfileUpdater {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update_content(&self, existing: Option<&str>) -> Result<String> {
        let Some(existing) = existing else {
            return Err(Error::updater(NAME, "lockfile does not exist"));
        };

        let mut doc: DocumentMut = existing.parse()?;

        let Some(packages) = doc.get_mut("package").and_then(Item::as_array_of_tables_mut)
        else {
            warn!("Lockfile has no [[package]] entries; leaving it unchanged");
            return Ok(existing.to_string());
        };

        let mut updated = 0usize;
        for package in packages.iter_mut() {
            let Some(name) = package.get("name").and_then(Item::as_str) else {
                continue;
            };
            let Some(version) = self.versions.get(name) else {
                continue;
            };
            let version = version.to_string();
            if let Some(item) = package.get_mut("version")
                && replace_string_value(item, &version)
            {
                updated += 1;
            }
        }

        debug!(
            updated,
            tracked = self.versions.len(),
            "Pinned workspace packages in lockfile"
        );
        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    const LOCKFILE: &str = r#"# This file is automatically @generated by Cargo.
# It is not intended for manual editing.
version = 4

[[package]]
name = "pkg-a"
version = "1.0.0"
dependencies = [
 "serde",
]

[[package]]
name = "root"
version = "1.0.0"

[[package]]
name = "serde"
version = "1.0.0"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "abc"
"#;

    fn versions() -> VersionMap {
        [
            ("root", Version::new(1, 1, 0)),
            ("pkg-a", Version::new(1, 1, 0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_pins_workspace_packages_only() {
        let updated = LockfileUpdater::new(versions())
            .update_content(Some(LOCKFILE))
            .unwrap();

        let expected = LOCKFILE
            .replacen(
                "name = \"pkg-a\"\nversion = \"1.0.0\"",
                "name = \"pkg-a\"\nversion = \"1.1.0\"",
                1,
            )
            .replacen(
                "name = \"root\"\nversion = \"1.0.0\"",
                "name = \"root\"\nversion = \"1.1.0\"",
                1,
            );
        assert_eq!(updated, expected);
        // External dependency untouched
        assert!(updated.contains("name = \"serde\"\nversion = \"1.0.0\""));
        // File format version untouched
        assert!(updated.contains("\nversion = 4\n"));
    }

    #[test]
    fn test_missing_lockfile_is_an_error() {
        let err = LockfileUpdater::new(versions()).update_content(None).unwrap_err();
        assert!(matches!(err, Error::Updater { updater: NAME, .. }));
    }

    #[test]
    fn test_lockfile_without_packages_is_unchanged() {
        let existing = "version = 4\n";
        let updated = LockfileUpdater::new(versions())
            .update_content(Some(existing))
            .unwrap();
        assert_eq!(updated, existing);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let updated = LockfileUpdater::new(VersionMap::new())
            .update_content(Some(LOCKFILE))
            .unwrap();
        assert_eq!(updated, LOCKFILE);
    }

    #[test]
    fn test_updating_twice_is_stable() {
        let updater = LockfileUpdater::new(versions());
        let once = updater.update_content(Some(LOCKFILE)).unwrap();
        let twice = updater.update_content(Some(&once)).unwrap();
        assert_eq!(once, twice);
    }
}
