//! `lockstep version`.

use tracing::instrument;

/// Version banner printed by `lockstep version`.
#[instrument]
#[must_use]
pub fn get_version_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let description = env!("CARGO_PKG_DESCRIPTION");

    tracing::debug!(package_version = version, "Gathering package information");

    format!(
        "lockstep {version}\n\
         {description}\n\
         Release planner: lockstep-release {version}\n"
    )
}
