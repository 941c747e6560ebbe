//! Loading `lockstep.toml`.

use crate::errors::CliError;
use lockstep_release::PlannerConfig;
use lockstep_release::config::CONFIG_FILE_NAME;
use std::io;
use std::path::Path;
use tracing::debug;

/// Load the planner configuration for the repository at `root`.
///
/// With an explicit `config_path` the file must exist. Otherwise
/// `<root>/lockstep.toml` is used when present, and the defaults when not.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the file cannot be read or is invalid.
pub async fn load_config(root: &Path, config_path: Option<&Path>) -> Result<PlannerConfig, CliError> {
    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (root.join(CONFIG_FILE_NAME), false),
    };

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(PlannerConfig::default());
        }
        Err(e) => {
            return Err(CliError::config(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config = PlannerConfig::from_toml_str(&content).map_err(|e| {
        CliError::config_with_help(
            format!("Invalid configuration in {}: {e}", path.display()),
            "Planner settings go in a [planner] table with camelCase keys",
        )
    })?;
    debug!(path = %path.display(), ?config, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_default_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).await.unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[tokio::test]
    async fn test_reads_default_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("lockstep.toml"),
            "[planner]\nlockfile = \"locks/Cargo.lock\"\n",
        )
        .unwrap();

        let config = load_config(temp.path(), None).await.unwrap();
        assert_eq!(config.lockfile_path(), "locks/Cargo.lock");
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("custom.toml");
        let err = load_config(temp.path(), Some(&missing)).await.unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lockstep.toml"), "[planner\n").unwrap();
        let err = load_config(temp.path(), None).await.unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
