//! In-memory plan application.
//!
//! [`preview_plan`] runs every instruction of an [`UpdatePlan`] against the
//! current content without writing anything, so a plan can be reviewed (or
//! handed to a file-patching step) as concrete before/after text.

use crate::error::{Error, Result};
use crate::planner::UpdatePlan;
use crate::provider::ContentProvider;
use futures::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Before and after content of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePreview {
    /// Repository path of the file.
    pub path: String,
    /// Current content, `None` when the file would be created.
    pub before: Option<String>,
    /// Content after the update.
    pub after: String,
}

impl FilePreview {
    /// Whether the file does not exist yet.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.before.is_none()
    }

    /// Whether applying the update would change the file.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.before.as_deref() != Some(self.after.as_str())
    }
}

/// Apply every instruction of `plan` in memory.
///
/// Targets are fetched concurrently, then updated in plan order. When two
/// instructions target the same path, the later one sees the earlier one's
/// output.
///
/// # Errors
///
/// Fails as a whole if any target cannot be read, if a missing target may
/// not be created, or if an updater rejects its input.
pub async fn preview_plan<P: ContentProvider + ?Sized>(
    plan: &UpdatePlan,
    provider: &P,
) -> Result<Vec<FilePreview>> {
    let fetched = try_join_all(plan.iter().map(|update| provider.get_content(&update.path))).await?;

    let mut pending: HashMap<&str, String> = HashMap::new();
    let mut previews = Vec::with_capacity(plan.len());

    for (update, content) in plan.iter().zip(fetched) {
        let before = pending
            .get(update.path.as_str())
            .cloned()
            .or_else(|| content.map(|c| c.raw));

        if before.is_none() && !update.create_if_missing {
            return Err(Error::updater(
                update.updater.kind(),
                format!("{} does not exist", update.path),
            ));
        }

        let after = update.updater.build().update_content(before.as_deref())?;
        debug!(path = %update.path, updater = update.updater.kind(), "Previewed update");

        pending.insert(update.path.as_str(), after.clone());
        previews.push(FilePreview {
            path: update.path.clone(),
            before,
            after,
        });
    }

    Ok(previews)
}
