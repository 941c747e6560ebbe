//! Error types for release planning operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for release planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning a workspace release.
///
/// Every variant is fatal: a planning call that returns one of these produces
/// no update instructions at all. Recoverable member problems are reported as
/// [`MemberWarning`](crate::workspace::MemberWarning) instead.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The root manifest does not have the shape a lockstep release needs.
    #[error("Release configuration error: {message}")]
    #[diagnostic(code(lockstep::release::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// The content provider could not read a file (as opposed to the file not existing).
    #[error("Failed to read {path}: {message}")]
    #[diagnostic(
        code(lockstep::release::content_access),
        help("The content source is unreliable; retry the whole release once it is reachable")
    )]
    ContentAccess {
        /// Repository path that was being read
        path: String,
        /// The error message
        message: String,
        /// The underlying source error
        #[source]
        source: Option<std::io::Error>,
    },

    /// A manifest could not be interpreted as TOML of the expected shape.
    #[error("Failed to parse manifest{}: {message}", path_suffix(.path))]
    #[diagnostic(
        code(lockstep::release::manifest_parse),
        help("Check that the manifest is valid TOML and that known fields have the right types")
    )]
    ManifestParse {
        /// The error message
        message: String,
        /// Repository path of the manifest, when known
        path: Option<String>,
    },

    /// An updater could not produce new content for its target file.
    #[error("{updater} update failed: {message}")]
    #[diagnostic(code(lockstep::release::updater))]
    Updater {
        /// Name of the updater that failed
        updater: &'static str,
        /// The error message
        message: String,
    },

    /// Failed to parse or validate a version string.
    #[error("Invalid version: {version}")]
    #[diagnostic(
        code(lockstep::release::invalid_version),
        help("Version must follow semantic versioning (e.g., 1.0.0, 2.1.0-beta.1)")
    )]
    InvalidVersion {
        /// The invalid version string
        version: String,
    },

    /// Wrapped IO error.
    #[error("IO error: {0}")]
    #[diagnostic(code(lockstep::release::io))]
    Io(#[from] std::io::Error),

    /// Wrapped TOML deserialization error.
    #[error("TOML error: {0}")]
    #[diagnostic(code(lockstep::release::toml))]
    Toml(#[from] toml::de::Error),

    /// Wrapped JSON error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(lockstep::release::json))]
    Json(#[from] serde_json::Error),

    /// Wrapped TOML editing error.
    #[error("TOML edit error: {0}")]
    #[diagnostic(code(lockstep::release::toml_edit))]
    TomlEdit(#[from] toml_edit::TomlError),
}

#[allow(clippy::ref_option)]
fn path_suffix(path: &Option<String>) -> String {
    path.as_ref().map(|p| format!(" {p}")).unwrap_or_default()
}

impl Error {
    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a new content access error.
    #[must_use]
    pub fn content_access(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContentAccess {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a new content access error with source.
    #[must_use]
    pub fn content_access_with_source(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ContentAccess {
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a new manifest parse error.
    #[must_use]
    pub fn manifest_parse(message: impl Into<String>, path: Option<String>) -> Self {
        Self::ManifestParse {
            message: message.into(),
            path,
        }
    }

    /// Create a new updater error.
    #[must_use]
    pub fn updater(updater: &'static str, message: impl Into<String>) -> Self {
        Self::Updater {
            updater,
            message: message.into(),
        }
    }

    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Whether this error came from the root manifest failing validation.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = Error::config("requires a workspace in root manifest", "add a [workspace] table");
        assert!(err.to_string().contains("requires a workspace"));
        assert!(err.is_config());
    }

    #[test]
    fn test_content_access_error() {
        let err = Error::content_access("crates/a/Cargo.toml", "connection reset");
        assert!(err.to_string().contains("crates/a/Cargo.toml"));
        assert!(err.to_string().contains("connection reset"));
        assert!(!err.is_config());
    }

    #[test]
    fn test_content_access_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::content_access_with_source("Cargo.lock", io_err);
        assert!(err.to_string().contains("access denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_manifest_parse_error_with_path() {
        let err = Error::manifest_parse("expected `=`", Some("crates/b/Cargo.toml".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed to parse manifest crates/b/Cargo.toml: expected `=`"
        );
    }

    #[test]
    fn test_manifest_parse_error_no_path() {
        let err = Error::manifest_parse("expected `=`", None);
        assert_eq!(err.to_string(), "Failed to parse manifest: expected `=`");
    }

    #[test]
    fn test_updater_error() {
        let err = Error::updater("lockfile", "Cargo.lock does not exist");
        assert!(err.to_string().starts_with("lockfile update failed"));
    }

    #[test]
    fn test_invalid_version_error() {
        let err = Error::invalid_version("not-a-version");
        assert!(err.to_string().contains("not-a-version"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let err: Error = toml_err.into();
        assert!(err.to_string().starts_with("TOML error"));
    }

    #[test]
    fn test_from_toml_edit_error() {
        let toml_err = "a = ".parse::<toml_edit::DocumentMut>().unwrap_err();
        let err: Error = toml_err.into();
        assert!(err.to_string().contains("TOML edit error"));
    }
}
