//! CLI command implementations.
//!
//! Each command returns its stdout text; printing happens in `main`.

pub mod plan;
pub mod version;
