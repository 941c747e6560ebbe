//! `lockstep plan`: build and print a release plan.

use crate::cli::OutputFormat;
use crate::config::load_config;
use crate::errors::CliError;
use crate::provider::FsContentProvider;
use chrono::{Local, NaiveDate};
use lockstep_release::{
    CargoWorkspaceStrategy, FilePreview, ReleaseStrategy, UpdatePlan, Version, preview_plan,
};
use similar::TextDiff;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Where the changelog entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogSource {
    /// Do not touch the changelog.
    Skip,
    /// Literal entry text.
    Entry(String),
    /// Entry read from a file.
    File(PathBuf),
    /// A bare `## [version] - date` heading.
    Default,
}

/// Validated options of `lockstep plan`.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Repository directory.
    pub root: PathBuf,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
    /// Version to release.
    pub version: Version,
    /// Changelog handling.
    pub changelog: ChangelogSource,
    /// Output format.
    pub output: OutputFormat,
    /// Whether to render diffs.
    pub diff: bool,
}

/// Heading used when no changelog entry is given.
#[must_use]
pub fn default_changelog_entry(version: &Version, date: NaiveDate) -> String {
    format!("## [{version}] - {}", date.format("%Y-%m-%d"))
}

/// Build the plan for `options` and render it.
///
/// # Errors
///
/// Returns [`CliError::Config`] for unusable configuration or changelog
/// input, and [`CliError::Release`] when the workspace cannot be planned.
#[instrument(name = "plan", skip_all, fields(root = %options.root.display(), version = %options.version))]
pub async fn execute_plan(options: &PlanOptions) -> Result<String, CliError> {
    let config = load_config(&options.root, options.config.as_deref()).await?;

    let (entry, skip_changelog) = match &options.changelog {
        ChangelogSource::Skip => (String::new(), true),
        ChangelogSource::Entry(entry) => (entry.clone(), false),
        ChangelogSource::File(path) => {
            let entry = tokio::fs::read_to_string(path).await.map_err(|e| {
                CliError::config(format!(
                    "Failed to read changelog entry {}: {e}",
                    path.display()
                ))
            })?;
            (entry, false)
        }
        ChangelogSource::Default => (
            default_changelog_entry(&options.version, Local::now().date_naive()),
            false,
        ),
    };

    let provider = Arc::new(FsContentProvider::new(&options.root));
    let strategy = CargoWorkspaceStrategy::new(Arc::clone(&provider), config);
    let plan = strategy
        .build_updates(&options.version, &entry, skip_changelog)
        .await?;

    let previews = if options.diff {
        Some(preview_plan(&plan, provider.as_ref()).await?)
    } else {
        None
    };

    info!(updates = plan.len(), warnings = plan.warnings.len(), "Plan ready");

    match options.output {
        OutputFormat::Json => render_json(&plan, previews.as_deref()),
        OutputFormat::Human => Ok(render_human(&plan, previews.as_deref())),
    }
}

fn render_json(plan: &UpdatePlan, previews: Option<&[FilePreview]>) -> Result<String, CliError> {
    let rendered = match previews {
        Some(previews) => serde_json::to_string_pretty(&serde_json::json!({
            "plan": plan,
            "previews": previews,
        }))
        .map_err(lockstep_release::Error::from)?,
        None => plan.to_json()?,
    };
    Ok(rendered + "\n")
}

fn render_human(plan: &UpdatePlan, previews: Option<&[FilePreview]>) -> String {
    let mut output = plan.to_human_readable();

    if let Some(previews) = previews {
        for preview in previews {
            output.push('\n');
            if preview.is_changed() {
                output.push_str(&format_unified_diff(preview));
            } else {
                let _ = writeln!(output, "{}: no changes", preview.path);
            }
        }
    }

    output
}

fn format_unified_diff(preview: &FilePreview) -> String {
    let current = preview.before.as_deref().unwrap_or("");
    let diff = TextDiff::from_lines(current, &preview.after);
    let from = if preview.is_new() {
        "/dev/null".to_string()
    } else {
        format!("a/{}", preview.path)
    };
    let to = format!("b/{}", preview.path);
    diff.unified_diff().header(&from, &to).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ROOT: &str = "[workspace]\nmembers = [\"a\"]\n\n[workspace.package]\nversion = \"0.1.0\"\n\n[package]\nname = \"root\"\n";

    fn workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Cargo.toml"), ROOT).unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("a/Cargo.toml"), "[package]\nname = \"pkg-a\"\n").unwrap();
        fs::write(
            temp.path().join("Cargo.lock"),
            "version = 4\n\n[[package]]\nname = \"pkg-a\"\nversion = \"0.1.0\"\n\n[[package]]\nname = \"root\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        temp
    }

    fn options(root: &TempDir, changelog: ChangelogSource) -> PlanOptions {
        PlanOptions {
            root: root.path().to_path_buf(),
            config: None,
            version: Version::new(0, 2, 0),
            changelog,
            output: OutputFormat::Human,
            diff: false,
        }
    }

    #[test]
    fn test_default_changelog_entry() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            default_changelog_entry(&Version::new(1, 0, 0), date),
            "## [1.0.0] - 2024-03-09"
        );
    }

    #[tokio::test]
    async fn test_execute_plan_human() {
        let temp = workspace();
        let output = execute_plan(&options(&temp, ChangelogSource::Skip))
            .await
            .unwrap();

        assert!(output.starts_with("Release plan for 0.2.0 (2 update(s)):"));
        assert!(output.contains("pins 2 package(s): root, pkg-a"));
    }

    #[tokio::test]
    async fn test_execute_plan_with_diff_writes_nothing() {
        let temp = workspace();
        let mut options = options(&temp, ChangelogSource::Entry("## [0.2.0]\n\n- Notes".into()));
        options.diff = true;

        let output = execute_plan(&options).await.unwrap();

        assert!(output.contains("--- /dev/null\n+++ b/CHANGELOG.md"));
        assert!(output.contains("-version = \"0.1.0\"\n+version = \"0.2.0\""));
        assert!(!temp.path().join("CHANGELOG.md").exists());
        assert_eq!(fs::read_to_string(temp.path().join("Cargo.toml")).unwrap(), ROOT);
    }

    #[tokio::test]
    async fn test_execute_plan_json_with_diff() {
        let temp = workspace();
        let mut options = options(&temp, ChangelogSource::Skip);
        options.output = OutputFormat::Json;
        options.diff = true;

        let output = execute_plan(&options).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["plan"]["version"], "0.2.0");
        assert_eq!(json["previews"][0]["path"], "Cargo.toml");
        assert!(json["previews"][1]["after"].as_str().unwrap().contains("0.2.0"));
    }

    #[tokio::test]
    async fn test_changelog_entry_from_file() {
        let temp = workspace();
        let entry_path = temp.path().join("entry.md");
        fs::write(&entry_path, "## [0.2.0]\n\n- From a file\n").unwrap();

        let mut options = options(&temp, ChangelogSource::File(entry_path));
        options.output = OutputFormat::Json;
        let output = execute_plan(&options).await.unwrap();

        assert!(output.contains("From a file"));
    }

    #[tokio::test]
    async fn test_missing_changelog_file_is_config_error() {
        let temp = workspace();
        let options = options(&temp, ChangelogSource::File(temp.path().join("missing.md")));
        let err = execute_plan(&options).await.unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[tokio::test]
    async fn test_non_workspace_root_is_release_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Cargo.toml"), "[package]\nname = \"solo\"\n").unwrap();

        let err = execute_plan(&options(&temp, ChangelogSource::Default))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Release(lockstep_release::Error::Config { .. })));
    }
}
